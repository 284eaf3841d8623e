use serde_json::json;

use crate::archmodel::analyzer::{AnalysisResult, Component};

/// Renders the analysis as a UML class diagram in DOT format.
pub struct UmlGenerator<'a> {
    analysis: &'a AnalysisResult,
}

impl<'a> UmlGenerator<'a> {
    pub fn new(analysis: &'a AnalysisResult) -> Self {
        Self { analysis }
    }

    pub fn generate_class_diagram(&self) -> String {
        let mut dot = String::from("digraph \"UML Class Diagram\" {\n");
        dot.push_str("    rankdir=TB;\n");

        for component in self.analysis.classes() {
            if let Component::Class { name, methods, .. } = component {
                let mut label = name.clone();
                if !methods.is_empty() {
                    label.push('|');
                    label.push_str(&methods.join("\\n"));
                }
                dot.push_str(&format!(
                    "    \"{}\" [label=\"{}\", shape=record];\n",
                    name, label
                ));
            }
        }

        for component in self.analysis.classes() {
            if let Component::Class { name, bases, .. } = component {
                for base in bases {
                    dot.push_str(&format!(
                        "    \"{}\" -> \"{}\" [arrowhead=empty];\n",
                        base, name
                    ));
                }
            }
        }

        dot.push_str("}\n");
        dot
    }
}

/// Renders the analysis as a 4+1 view model.
pub struct FourPlusOneGenerator<'a> {
    analysis: &'a AnalysisResult,
}

impl<'a> FourPlusOneGenerator<'a> {
    pub fn new(analysis: &'a AnalysisResult) -> Self {
        Self { analysis }
    }

    pub fn generate_views(&self) -> serde_json::Value {
        json!({
            "logical_view": {
                "components": self.analysis.classes().collect::<Vec<_>>(),
                "relationships": self.analysis.relationships.iter()
                    .filter(|r| r.kind == "inheritance")
                    .collect::<Vec<_>>(),
            },
            "process_view": {
                "processes": self.analysis.functions().collect::<Vec<_>>(),
                "interactions": self.analysis.relationships,
            },
            "development_view": {
                "modules": self.analysis.components,
                "dependencies": self.analysis.relationships,
            },
            "physical_view": {
                "nodes": ["Server", "Client"],
                "connections": self.analysis.relationships,
            },
            "scenarios": [
                {
                    "name": "System Operation",
                    "description": "Basic system operation flow",
                    "components": self.analysis.components,
                }
            ],
        })
    }
}

/// Renders the analysis as an architecture description language block.
pub struct AdlGenerator<'a> {
    analysis: &'a AnalysisResult,
}

impl<'a> AdlGenerator<'a> {
    pub fn new(analysis: &'a AnalysisResult) -> Self {
        Self { analysis }
    }

    pub fn generate_adl(&self) -> String {
        let mut adl = String::from("architecture SoftwareSystem {\n");

        adl.push_str("  components {\n");
        for component in self.analysis.classes() {
            if let Component::Class { name, methods, .. } = component {
                adl.push_str(&format!("    component {} {{\n", name));
                adl.push_str("      type: class\n");
                adl.push_str(&format!("      methods: {}\n", methods.join(", ")));
                adl.push_str("    }\n");
            }
        }
        adl.push_str("  }\n");

        adl.push_str("  connectors {\n");
        for relationship in &self.analysis.relationships {
            adl.push_str(&format!(
                "    connector {}_to_{} {{\n",
                relationship.source, relationship.target
            ));
            adl.push_str(&format!("      type: {}\n", relationship.kind));
            adl.push_str(&format!("      source: {}\n", relationship.source));
            adl.push_str(&format!("      target: {}\n", relationship.target));
            adl.push_str("    }\n");
        }
        adl.push_str("  }\n");

        adl.push_str("}\n");
        adl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archmodel::analyzer::CodeAnalyzer;

    const SAMPLE: &str = r#"
        use std::fmt;

        pub trait Shape {
            fn area(&self) -> f64;
        }

        pub struct Circle;

        impl Shape for Circle {
            fn area(&self) -> f64 {
                0.0
            }
        }
    "#;

    #[test]
    fn uml_diagram_records_inheritance_edges() {
        let analysis = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();
        let dot = UmlGenerator::new(&analysis).generate_class_diagram();

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("\"Circle\" [label=\"Circle|area\", shape=record];"));
        assert!(dot.contains("\"Shape\" -> \"Circle\" [arrowhead=empty];"));
    }

    #[test]
    fn four_plus_one_views_cover_all_five() {
        let analysis = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();
        let views = FourPlusOneGenerator::new(&analysis).generate_views();

        for view in [
            "logical_view",
            "process_view",
            "development_view",
            "physical_view",
            "scenarios",
        ] {
            assert!(views.get(view).is_some(), "missing {}", view);
        }
        assert_eq!(
            views["physical_view"]["nodes"],
            serde_json::json!(["Server", "Client"])
        );
    }

    #[test]
    fn adl_lists_components_and_connectors() {
        let analysis = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();
        let adl = AdlGenerator::new(&analysis).generate_adl();

        assert!(adl.starts_with("architecture SoftwareSystem {"));
        assert!(adl.contains("component Circle {"));
        assert!(adl.contains("connector std_to_external {"));
        assert!(adl.contains("type: import"));
    }
}
