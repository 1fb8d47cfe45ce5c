use nb2prod_protocol::CodeUnit;
use nb2prod_unit_analyzer::{AnalyzerConfig, SymbolFacts, UnitAnalyzer};
use std::collections::BTreeSet;

fn analyze(code: &str) -> SymbolFacts {
    let mut analyzer = UnitAnalyzer::new(AnalyzerConfig::default()).expect("python grammar");
    analyzer.analyze(&CodeUnit::code(0, code))
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn compound_statement_header_binds_before_body() {
    let code = r"
for fold in range(k):
    scores.append(evaluate(model, fold))
";
    let facts = analyze(code);
    assert_eq!(
        facts.external_references,
        names(&["evaluate", "k", "model", "scores"])
    );
    assert!(!facts.external_references.contains("fold"));
    assert_eq!(facts.defined_names, names(&["fold"]));
}

#[test]
fn nested_block_assignments_are_visible_later() {
    let code = r"
if use_cache:
    frame = cached
else:
    frame = fresh()
summary = frame.describe()
";
    let facts = analyze(code);
    assert!(facts.defined_names.contains("frame"));
    assert!(!facts.external_references.contains("frame"));
    assert_eq!(
        facts.external_references,
        names(&["cached", "fresh", "use_cache"])
    );
}

#[test]
fn class_body_exposes_only_free_names() {
    let code = r"
class Scaler(Base):
    factor = 2

    def apply(self, values):
        return [v * self.factor + offset for v in values]
";
    let facts = analyze(code);
    assert_eq!(facts.function_names, names(&["Scaler"]));
    assert_eq!(facts.external_references, names(&["Base", "offset"]));
    assert!(!facts.defined_names.contains("factor"));
    assert!(!facts.defined_names.contains("apply"));
}

#[test]
fn imports_inside_try_are_seeded() {
    let code = r"
try:
    import ujson as json_lib
except ImportError as err:
    json_lib = fallback
payload = json_lib.loads(raw)
";
    let facts = analyze(code);
    assert!(facts.imported_names.contains("json_lib"));
    assert!(facts.defined_names.contains("err"));
    assert_eq!(
        facts.external_references,
        names(&["ImportError", "fallback", "raw"])
    );
}

#[test]
fn decorated_function_is_a_definition() {
    let code = r"
@cache(size=limit)
def features(frame):
    return frame[columns]
";
    let facts = analyze(code);
    assert_eq!(facts.function_names, names(&["features"]));
    assert_eq!(
        facts.external_references,
        names(&["cache", "columns", "limit"])
    );
}

#[test]
fn walrus_and_tuple_targets_bind() {
    let facts = analyze("train, test = split(df)\nif (n := len(train)) > 0:\n    ratio = n / total\n");
    assert_eq!(facts.defined_names, names(&["n", "ratio", "test", "train"]));
    assert_eq!(facts.external_references, names(&["df", "split", "total"]));
}

#[test]
fn cell_magic_is_skipped_unless_disabled() {
    let code = "%%time\nmodel = fit(df)\n";
    assert!(analyze(code).is_empty());

    let config = AnalyzerConfig {
        strip_magics: false,
        ..AnalyzerConfig::default()
    };
    let mut analyzer = UnitAnalyzer::new(config).expect("python grammar");
    assert!(analyzer.analyze(&CodeUnit::code(0, code)).is_empty());
}

#[test]
fn operator_continuation_lines_are_not_magics() {
    let facts = analyze("label = (\"%s rows\"\n    % count)\n");
    assert_eq!(facts.defined_names, names(&["label"]));
    assert_eq!(facts.external_references, names(&["count"]));

    let facts = analyze("%matplotlib inline\nchanged = (old_total\n    != new_total)\n");
    assert_eq!(facts.defined_names, names(&["changed"]));
    assert_eq!(facts.external_references, names(&["new_total", "old_total"]));
}

#[test]
fn facts_serialize_for_debug_output() {
    let facts = analyze("data = load('train.csv')");
    let json = serde_json::to_value(&facts).expect("serialize facts");
    assert_eq!(json["defined_names"][0], "data");
    assert_eq!(json["has_hardcoded_paths"], false);
}
