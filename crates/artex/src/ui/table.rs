use artex_extract::Report;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Panel, Style, object::Columns},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::rounded());
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Extracted")]
    pub extracted: usize,
    #[tabled(rename = "Failed")]
    pub failed: usize,
}

pub fn summary_rows(report: &Report) -> Vec<SummaryRow> {
    report
        .categories
        .iter()
        .map(|c| SummaryRow {
            category: c.name.clone(),
            extracted: c.succeeded,
            failed: c.failed,
        })
        .collect()
}

pub fn summary_table(report: &Report) -> Table {
    let mut table = Formatter {
        header: Some("Artifact Extraction Summary".to_string()),
        footer: Some(format!(
            "Total: {} extracted, {} failed",
            report.succeeded, report.failed
        )),
    }
    .build(summary_rows(report));
    table.modify(Columns::new(1..), Alignment::right());
    table
}

#[cfg(test)]
mod tests {
    use artex_extract::Ledger;

    use super::*;

    #[test]
    fn formatter_panels_are_optional() {
        let rows = vec![SummaryRow {
            category: "Cache".into(),
            extracted: 3,
            failed: 0,
        }];
        let plain = Formatter::default().build(rows.clone()).to_string();
        assert!(plain.contains("Extracted"));
        assert!(plain.contains("Cache"));

        let framed = Formatter {
            header: Some("Top".into()),
            footer: Some("Bottom".into()),
        }
        .build(rows)
        .to_string();
        let (top, bottom) = (framed.find("Top").unwrap(), framed.find("Bottom").unwrap());
        assert!(top < framed.find("Cache").unwrap());
        assert!(framed.find("Cache").unwrap() < bottom);
    }

    #[test]
    fn summary_table_totals_in_footer() {
        let mut ledger = Ledger::new();
        ledger.record_success("Cache", "/a");
        ledger.record_success("Logs", "/b");
        ledger.record_failure("Logs", "/c", "denied");

        let table = summary_table(&ledger.report()).to_string();
        assert!(table.contains("Artifact Extraction Summary"));
        assert!(table.contains("Total: 2 extracted, 1 failed"));
    }
}
