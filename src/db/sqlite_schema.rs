pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Tables every healthy store must expose.
pub const ESSENTIAL_TABLES: [&str; 6] = [
    "words",
    "groups",
    "word_groups",
    "study_activities",
    "study_sessions",
    "word_review_items",
];

/// Splits a script on `;`, ignoring separators inside quoted literals or identifiers.
/// Leading `--` comment lines are stripped from each statement.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
            }
            ';' if !in_single_quote && !in_double_quote => {
                push_statement(&mut statements, &current);
                current.clear();
                continue;
            }
            _ => {}
        }

        current.push(ch);
    }

    push_statement(&mut statements, &current);

    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let stmt = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = stmt.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
