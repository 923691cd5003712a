//! Terminal tables for command output

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use querybench_analyzer::PlanAnalysis;
use querybench_completion::CompletionList;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn completion_table(list: &CompletionList) -> Table {
    let mut table = new_table(vec!["Label", "Kind", "Detail"]);
    for candidate in &list.candidates {
        table.add_row(vec![
            candidate.label.clone(),
            candidate.kind.as_str().to_string(),
            candidate.detail.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub fn print_completions(list: &CompletionList) {
    if list.is_empty() {
        println!("No completions (word: {:?})", list.word);
        return;
    }
    println!("Word: {:?}", list.word);
    println!("{}", completion_table(list));
}

pub fn warning_table(analysis: &PlanAnalysis) -> Table {
    let mut table = new_table(vec!["Severity", "Kind", "Table", "Message"]);
    for warning in &analysis.warnings {
        table.add_row(vec![
            warning.severity.as_str().to_string(),
            warning.kind.as_str().to_string(),
            warning.table.clone(),
            warning.message.clone(),
        ]);
    }
    table
}

pub fn suggestion_table(analysis: &PlanAnalysis) -> Table {
    let mut table = new_table(vec!["Table", "Columns", "Reason", "DDL"]);
    for suggestion in &analysis.suggestions {
        table.add_row(vec![
            suggestion.table.clone(),
            suggestion.columns.join(", "),
            suggestion.reason.clone(),
            suggestion.ddl.clone(),
        ]);
    }
    table
}

pub fn print_analysis(analysis: &PlanAnalysis) {
    println!("{}", analysis.summary);
    if !analysis.warnings.is_empty() {
        println!("\nWarnings");
        println!("{}", warning_table(analysis));
    }
    if !analysis.suggestions.is_empty() {
        println!("\nIndex suggestions");
        println!("{}", suggestion_table(analysis));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querybench_analyzer::PlanAnalyzer;
    use querybench_completion::{CompletionCandidate, CompletionKind};
    use querybench_core::PlanRow;

    #[test]
    fn test_completion_table_rows() {
        let list = CompletionList {
            candidates: vec![
                CompletionCandidate::new("users", CompletionKind::Table).with_detail("table"),
                CompletionCandidate::new("id", CompletionKind::Column),
            ],
            ..Default::default()
        };

        let rendered = completion_table(&list).to_string();
        assert!(rendered.contains("users"));
        assert!(rendered.contains("column"));
    }

    #[test]
    fn test_analysis_tables() {
        let analysis = PlanAnalyzer::new().analyze(
            vec![PlanRow::new("orders", "ALL").with_rows_estimate(50_000)],
            "SELECT * FROM orders WHERE orders.customer_id = 5",
        );

        assert!(warning_table(&analysis).to_string().contains("critical"));
        assert!(suggestion_table(&analysis).to_string().contains("customer_id"));
    }
}
