use crate::model::employee::Employee;
use chrono::Local;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
    TextMatrix,
};

pub const COMPANY_NAME: &str = "Fintradify Pvt. Ltd.";
const COMPANY_ADDRESS: &str = "C6, C Block, Sector 7, Noida, Uttar Pradesh 201301 India";
const COMPANY_CONTACT: &str = "Email: hr@fintradify.com | Phone: +91 78360 09907";
const WATERMARK: &str = "FINTRADIFY";

/// Flat constant-offset model: no proration, no tax tables, no
/// attendance-linked adjustment.
pub const FIXED_ALLOWANCE: f64 = 5000.0;
pub const FIXED_DEDUCTION: f64 = 2000.0;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const ROW_HEIGHT: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBreakdown {
    pub basic: f64,
    pub allowances: f64,
    pub deductions: f64,
}

impl SalaryBreakdown {
    pub fn compute(base_salary: f64) -> Self {
        Self {
            basic: base_salary,
            allowances: FIXED_ALLOWANCE,
            deductions: FIXED_DEDUCTION,
        }
    }

    pub fn total_earnings(&self) -> f64 {
        self.basic + self.allowances
    }

    pub fn total_deductions(&self) -> f64 {
        self.deductions
    }

    pub fn net(&self) -> f64 {
        self.total_earnings() - self.total_deductions()
    }
}

/// y grows downward in the layout below, like the original document.
fn from_top(mm: f32) -> Mm {
    Mm(PAGE_HEIGHT - mm)
}

fn hline(layer: &PdfLayerReference, x1: f32, x2: f32, top: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), from_top(top)), false),
            (Point::new(Mm(x2), from_top(top)), false),
        ],
        is_closed: false,
    });
}

fn rect(layer: &PdfLayerReference, x: f32, top: f32, width: f32, height: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), from_top(top)), false),
            (Point::new(Mm(x + width), from_top(top)), false),
            (Point::new(Mm(x + width), from_top(top + height)), false),
            (Point::new(Mm(x), from_top(top + height)), false),
        ],
        is_closed: true,
    });
}

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

const HEADER_BLUE: (f32, f32, f32) = (0.0, 0.19, 0.53);
const TEXT_GRAY: (f32, f32, f32) = (0.2, 0.2, 0.2);

fn fill(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

/// Renders the payslip PDF in memory and returns the document bytes. Nothing
/// touches the filesystem, so there is no artifact to clean up on any exit
/// path.
pub fn render(employee: &Employee, month: &str, year: &str) -> anyhow::Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Salary Slip {} {}", month, year),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };
    let layer = doc.get_page(page).get_layer(layer);

    // Company header
    fill(&layer, HEADER_BLUE);
    layer.use_text(COMPANY_NAME, 20.0, Mm(MARGIN), from_top(16.0), &fonts.bold);
    fill(&layer, TEXT_GRAY);
    layer.use_text(COMPANY_ADDRESS, 10.0, Mm(MARGIN), from_top(23.0), &fonts.regular);
    layer.use_text(COMPANY_CONTACT, 10.0, Mm(MARGIN), from_top(28.0), &fonts.regular);

    // Title
    fill(&layer, HEADER_BLUE);
    layer.use_text(
        format!("Pay Slip for {} {}", month, year),
        16.0,
        Mm(64.0),
        from_top(42.0),
        &fonts.bold,
    );

    // Employee details table
    fill(&layer, TEXT_GRAY);
    layer.use_text("Employee Details", 12.0, Mm(MARGIN), from_top(54.0), &fonts.bold);

    let details = [
        ("Employee ID", employee.employee_code.clone()),
        ("Name", employee.name.clone()),
        ("Position", employee.position.clone()),
        (
            "Department",
            employee.department.clone().unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Tax ID",
            employee.tax_id.clone().unwrap_or_else(|| "N/A".to_string()),
        ),
    ];

    let details_top = 58.0;
    let table_width = PAGE_WIDTH - 2.0 * MARGIN;
    layer.set_outline_thickness(0.5);
    for (i, (label, value)) in details.iter().enumerate() {
        let row_top = details_top + i as f32 * ROW_HEIGHT;
        layer.use_text(*label, 10.0, Mm(MARGIN + 2.0), from_top(row_top + 5.0), &fonts.bold);
        layer.use_text(
            value.as_str(),
            10.0,
            Mm(MARGIN + 55.0),
            from_top(row_top + 5.0),
            &fonts.regular,
        );
        hline(&layer, MARGIN, MARGIN + table_width, row_top + ROW_HEIGHT);
    }
    layer.set_outline_thickness(1.0);
    rect(&layer, MARGIN, details_top, table_width, details.len() as f32 * ROW_HEIGHT);

    // Earnings and deductions table
    layer.use_text(
        "Earnings and Deductions",
        12.0,
        Mm(MARGIN),
        from_top(103.0),
        &fonts.bold,
    );

    let pay = SalaryBreakdown::compute(employee.salary);
    let rows: [(&str, String, bool); 10] = [
        ("Earnings", "Amount (INR)".to_string(), true),
        ("Basic Salary", money(pay.basic), false),
        ("Allowances", money(pay.allowances), false),
        ("Total Earnings", money(pay.total_earnings()), false),
        ("", String::new(), false),
        ("Deductions", "Amount (INR)".to_string(), true),
        ("Tax Deductions", money(pay.deductions), false),
        ("Total Deductions", money(pay.total_deductions()), false),
        ("", String::new(), false),
        ("Net Salary", money(pay.net()), true),
    ];

    let salary_top = 108.0;
    layer.set_outline_thickness(0.5);
    for (i, (label, amount, emphasized)) in rows.iter().enumerate() {
        let row_top = salary_top + i as f32 * ROW_HEIGHT;
        let font = if *emphasized { &fonts.bold } else { &fonts.regular };
        layer.use_text(*label, 10.0, Mm(MARGIN + 2.0), from_top(row_top + 5.0), font);
        layer.use_text(
            amount.as_str(),
            10.0,
            Mm(MARGIN + 130.0),
            from_top(row_top + 5.0),
            font,
        );
        if !label.is_empty() {
            hline(&layer, MARGIN, MARGIN + table_width, row_top + ROW_HEIGHT);
        }
    }
    layer.set_outline_thickness(1.0);
    rect(&layer, MARGIN, salary_top, table_width, rows.len() as f32 * ROW_HEIGHT);

    // Diagonal watermark, light enough not to obscure the tables
    layer.begin_text_section();
    fill(&layer, (0.87, 0.87, 0.87));
    layer.set_font(&fonts.bold, 50.0);
    layer.set_text_matrix(TextMatrix::TranslateRotate(
        Mm(45.0).into(),
        Mm(90.0).into(),
        45.0,
    ));
    layer.write_text(WATERMARK, &fonts.bold);
    layer.end_text_section();

    // Footer
    fill(&layer, TEXT_GRAY);
    layer.use_text(
        "This is a system-generated document. No signature is required.",
        8.0,
        Mm(58.0),
        from_top(PAGE_HEIGHT - 18.0),
        &fonts.regular,
    );
    layer.use_text(
        format!(
            "{} | Generated on: {}",
            COMPANY_NAME,
            Local::now().format("%Y-%m-%d")
        ),
        8.0,
        Mm(66.0),
        from_top(PAGE_HEIGHT - 13.0),
        &fonts.regular,
    );

    Ok(doc.save_to_bytes()?)
}

pub fn file_name(employee_code: &str, month: &str, year: &str) -> String {
    format!("salary_slip_{}_{}_{}.pdf", employee_code, month, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(salary: f64) -> Employee {
        Employee {
            id: 1,
            employee_code: "TRD1042".to_string(),
            name: "John Doe".to_string(),
            email: "john.doe@gmail.com".to_string(),
            position: "Engineer".to_string(),
            salary,
            department: None,
            tax_id: None,
        }
    }

    #[test]
    fn net_is_base_plus_allowance_minus_deduction() {
        let pay = SalaryBreakdown::compute(50000.0);
        assert_eq!(pay.total_earnings(), 55000.0);
        assert_eq!(pay.total_deductions(), 2000.0);
        assert_eq!(pay.net(), 53000.0);
    }

    #[test]
    fn zero_base_still_nets_the_fixed_offset() {
        assert_eq!(SalaryBreakdown::compute(0.0).net(), 3000.0);
    }

    #[test]
    fn render_produces_a_pdf() {
        let bytes = render(&employee(50000.0), "January", "2026").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn file_name_carries_code_and_period() {
        assert_eq!(
            file_name("TRD1042", "January", "2026"),
            "salary_slip_TRD1042_January_2026.pdf"
        );
    }
}
