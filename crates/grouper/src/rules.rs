//! Rule tables for categorisation, merge compatibility and naming.

use nb2prod_protocol::Category;

/// First matching row wins; keywords are substrings of the joined variable names
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Data, &["df", "data", "dataset", "load", "read"]),
    (Category::Feature, &["x_", "y_", "feature", "scaled", "transform"]),
    (Category::Model, &["model", "train", "fit", "predict"]),
    (Category::Visualization, &["plot", "fig", "ax", "chart"]),
];

/// (current, next) pairs that may merge through a shared symbol
const COMPATIBLE: &[(Category, Category)] = &[
    (Category::Data, Category::Data),
    (Category::Data, Category::Feature),
    (Category::Feature, Category::Feature),
    (Category::Feature, Category::Model),
    (Category::Data, Category::Model),
    (Category::Model, Category::Model),
    (Category::Utility, Category::Data),
    (Category::Utility, Category::Feature),
    (Category::Utility, Category::Model),
    (Category::Data, Category::Utility),
    (Category::Feature, Category::Utility),
    (Category::Model, Category::Utility),
];

struct NamingRule {
    category: Category,
    keywords: &'static [(&'static str, &'static str)],
    default: &'static str,
}

const NAMING_RULES: &[NamingRule] = &[
    NamingRule {
        category: Category::Data,
        keywords: &[("clean", "load_and_clean_data"), ("processed", "load_and_clean_data")],
        default: "load_data",
    },
    NamingRule {
        category: Category::Feature,
        keywords: &[("scaled", "scale_features"), ("normalized", "scale_features")],
        default: "engineer_features",
    },
    NamingRule {
        category: Category::Model,
        keywords: &[("predict", "make_predictions"), ("evaluate", "evaluate_model")],
        default: "train_model",
    },
    NamingRule {
        category: Category::Visualization,
        keywords: &[],
        default: "create_visualization",
    },
    NamingRule {
        category: Category::Utility,
        keywords: &[],
        default: "process_data",
    },
];

/// Category of a unit from its variable names
pub fn categorize<'a, I>(variable_names: I) -> Category
where
    I: IntoIterator<Item = &'a String>,
{
    let joined = variable_names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| joined.contains(kw)))
        .map_or(Category::Utility, |(category, _)| *category)
}

pub fn is_compatible(current: Category, next: Category) -> bool {
    COMPATIBLE.contains(&(current, next))
}

/// Suggested function name for a group of `category` returning `returns`
pub fn suggest_name(category: Category, returns: &[String]) -> &'static str {
    let joined = returns.join(" ").to_lowercase();
    NAMING_RULES
        .iter()
        .find(|rule| rule.category == category)
        .map_or("process_data", |rule| {
            rule.keywords
                .iter()
                .find(|(kw, _)| joined.contains(kw))
                .map_or(rule.default, |(_, name)| *name)
        })
}
