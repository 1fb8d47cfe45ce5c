use nb2prod_protocol::{Category, CodeUnit, FunctionCandidate};
use nb2prod_unit_analyzer::magic_lines;

const INDENT: &str = "    ";

fn description(category: Category) -> &'static str {
    match category {
        Category::Data => "Load and preprocess data.",
        Category::Feature => "Engineer features from data.",
        Category::Model => "Train and evaluate model.",
        Category::Visualization => "Create visualization.",
        Category::Utility => "Process data.",
    }
}

/// Render a candidate as a Python function built from its member units' source
pub fn render_function(candidate: &FunctionCandidate, units: &[CodeUnit]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "def {}({}):\n",
        candidate.name,
        candidate.parameters.join(", ")
    ));

    out.push_str(&format!("{INDENT}\"\"\"{}\n", description(candidate.category)));
    if !candidate.parameters.is_empty() {
        out.push_str(&format!("\n{INDENT}Args:\n"));
        for param in &candidate.parameters {
            out.push_str(&format!("{INDENT}{INDENT}{param}\n"));
        }
    }
    if !candidate.returns.is_empty() {
        out.push_str(&format!("\n{INDENT}Returns:\n"));
        for ret in &candidate.returns {
            out.push_str(&format!("{INDENT}{INDENT}{ret}\n"));
        }
    }
    out.push_str(&format!("{INDENT}\"\"\"\n"));

    // IPython magics have no meaning inside a function body
    let bodies: Vec<Vec<&str>> = candidate
        .units
        .iter()
        .filter_map(|index| units.iter().find(|unit| unit.index == *index))
        .map(|unit| {
            let source = unit.source.trim_end();
            source
                .lines()
                .zip(magic_lines(source))
                .filter_map(|(line, magic)| (!magic).then_some(line))
                .collect::<Vec<_>>()
        })
        .filter(|lines| lines.iter().any(|line| !line.trim().is_empty()))
        .collect();

    for (position, lines) in bodies.iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        for line in lines {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("{INDENT}{line}\n"));
            }
        }
    }

    if !candidate.returns.is_empty() {
        out.push_str(&format!("\n{INDENT}return {}\n", candidate.returns.join(", ")));
    }

    out
}

/// All candidates, separated the way PEP 8 separates top-level functions
pub fn render_module(candidates: &[FunctionCandidate], units: &[CodeUnit]) -> String {
    candidates
        .iter()
        .map(|candidate| render_function(candidate, units))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nb2prod_protocol::Group;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn candidate(parameters: &[&str], returns: &[&str]) -> FunctionCandidate {
        let to_vec = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        FunctionCandidate {
            name: "load_data".to_string(),
            category: Category::Data,
            units: vec![0, 2],
            parameters: to_vec(parameters),
            returns: to_vec(returns),
            group: Group {
                units: vec![0, 2],
                category: Category::Data,
                defined_names: BTreeSet::new(),
                external_references: BTreeSet::new(),
            },
        }
    }

    fn units() -> Vec<CodeUnit> {
        vec![
            CodeUnit::code(0, "%matplotlib inline\ndf = read(source)\n"),
            CodeUnit::markdown(1, "## Cleaning"),
            CodeUnit::code(2, "if df.empty:\n    raise ValueError(source)\ndf = df.dropna()"),
        ]
    }

    #[test]
    fn renders_signature_docstring_body_and_return() {
        let rendered = render_function(&candidate(&["source"], &["df"]), &units());
        let expected = r#"def load_data(source):
    """Load and preprocess data.

    Args:
        source

    Returns:
        df
    """
    df = read(source)

    if df.empty:
        raise ValueError(source)
    df = df.dropna()

    return df
"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn continuation_lines_survive_rendering() {
        let units = vec![
            CodeUnit::code(0, "!pip install lib\nchanged = (old\n    != new)"),
            CodeUnit::code(1, "label = (\"%s rows\"\n    % count)"),
        ];
        let mut candidate = candidate(&["count", "new", "old"], &["label"]);
        candidate.units = vec![0, 1];
        let rendered = render_function(&candidate, &units);

        assert!(!rendered.contains("pip install"));
        assert!(rendered.contains("    changed = (old\n        != new)\n\n"));
        assert!(rendered.contains("    label = (\"%s rows\"\n        % count)\n"));
    }

    #[test]
    fn no_interface_renders_bare_function() {
        let rendered = render_function(&candidate(&[], &[]), &units());
        assert!(rendered.starts_with("def load_data():\n    \"\"\"Load and preprocess data.\n    \"\"\"\n"));
        assert!(!rendered.contains("return"));
    }
}
