use serde::Serialize;

/// A named element extracted from the submitted source.
///
/// Structs, enums and traits all map to `class` components; free functions
/// map to `function` components. Methods are gathered from impl blocks,
/// implemented traits feed the `bases` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Class {
        name: String,
        methods: Vec<String>,
        bases: Vec<String>,
    },
    Function {
        name: String,
        parameters: Vec<String>,
    },
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Class { name, .. } => name,
            Component::Function { name, .. } => name,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Component::Class { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub components: Vec<Component>,
    pub relationships: Vec<Relationship>,
}

impl AnalysisResult {
    pub fn classes(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.is_class())
    }

    pub fn functions(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| !c.is_class())
    }
}

/// Extracts components and relationships from a Rust source file using the
/// standard parser. Parsing is the library's job; this only walks the tree.
pub struct CodeAnalyzer {
    file: syn::File,
}

struct ClassEntry {
    name: String,
    methods: Vec<String>,
    bases: Vec<String>,
}

struct FunctionEntry {
    name: String,
    parameters: Vec<String>,
}

impl CodeAnalyzer {
    pub fn parse(code: &str) -> Result<Self, syn::Error> {
        Ok(Self {
            file: syn::parse_file(code)?,
        })
    }

    pub fn analyze(&self) -> AnalysisResult {
        let mut classes: Vec<ClassEntry> = Vec::new();
        let mut functions: Vec<FunctionEntry> = Vec::new();
        let mut relationships: Vec<Relationship> = Vec::new();

        collect_items(
            &self.file.items,
            &mut classes,
            &mut functions,
            &mut relationships,
        );

        let mut components: Vec<Component> = classes
            .into_iter()
            .map(|entry| Component::Class {
                name: entry.name,
                methods: entry.methods,
                bases: entry.bases,
            })
            .collect();
        components.extend(functions.into_iter().map(|entry| Component::Function {
            name: entry.name,
            parameters: entry.parameters,
        }));

        AnalysisResult {
            components,
            relationships,
        }
    }
}

fn collect_items(
    items: &[syn::Item],
    classes: &mut Vec<ClassEntry>,
    functions: &mut Vec<FunctionEntry>,
    relationships: &mut Vec<Relationship>,
) {
    for item in items {
        match item {
            syn::Item::Struct(item) => classes.push(ClassEntry {
                name: item.ident.to_string(),
                methods: Vec::new(),
                bases: Vec::new(),
            }),
            syn::Item::Enum(item) => classes.push(ClassEntry {
                name: item.ident.to_string(),
                methods: Vec::new(),
                bases: Vec::new(),
            }),
            syn::Item::Trait(item) => {
                let methods = item
                    .items
                    .iter()
                    .filter_map(|entry| match entry {
                        syn::TraitItem::Fn(f) => Some(f.sig.ident.to_string()),
                        _ => None,
                    })
                    .collect();
                let bases = item
                    .supertraits
                    .iter()
                    .filter_map(|bound| match bound {
                        syn::TypeParamBound::Trait(t) => path_name(&t.path),
                        _ => None,
                    })
                    .collect();
                classes.push(ClassEntry {
                    name: item.ident.to_string(),
                    methods,
                    bases,
                });
            }
            syn::Item::Fn(item) => functions.push(FunctionEntry {
                name: item.sig.ident.to_string(),
                parameters: parameter_names(&item.sig),
            }),
            syn::Item::Impl(item) => apply_impl(item, classes),
            syn::Item::Use(item) => {
                if let Some(source) = use_root(&item.tree) {
                    relationships.push(Relationship {
                        kind: "import".to_string(),
                        source,
                        target: "external".to_string(),
                    });
                }
            }
            syn::Item::Mod(item) => {
                if let Some((_, nested)) = &item.content {
                    collect_items(nested, classes, functions, relationships);
                }
            }
            _ => {}
        }
    }
}

/// Fold an impl block into the component it targets. Impls may precede the
/// type declaration, so missing targets get a placeholder class entry.
fn apply_impl(item: &syn::ItemImpl, classes: &mut Vec<ClassEntry>) {
    let Some(target) = impl_target(item) else {
        return;
    };

    let position = match classes.iter().position(|entry| entry.name == target) {
        Some(position) => position,
        None => {
            classes.push(ClassEntry {
                name: target,
                methods: Vec::new(),
                bases: Vec::new(),
            });
            classes.len() - 1
        }
    };

    for entry in &item.items {
        if let syn::ImplItem::Fn(f) = entry {
            classes[position].methods.push(f.sig.ident.to_string());
        }
    }

    if let Some((_, path, _)) = &item.trait_ {
        if let Some(name) = path_name(path) {
            if !classes[position].bases.contains(&name) {
                classes[position].bases.push(name);
            }
        }
    }
}

fn impl_target(item: &syn::ItemImpl) -> Option<String> {
    match item.self_ty.as_ref() {
        syn::Type::Path(type_path) => path_name(&type_path.path),
        _ => None,
    }
}

fn path_name(path: &syn::Path) -> Option<String> {
    path.segments.last().map(|segment| segment.ident.to_string())
}

fn parameter_names(sig: &syn::Signature) -> Vec<String> {
    sig.inputs
        .iter()
        .map(|input| match input {
            syn::FnArg::Receiver(_) => "self".to_string(),
            syn::FnArg::Typed(pat) => match pat.pat.as_ref() {
                syn::Pat::Ident(ident) => ident.ident.to_string(),
                _ => "_".to_string(),
            },
        })
        .collect()
}

fn use_root(tree: &syn::UseTree) -> Option<String> {
    match tree {
        syn::UseTree::Path(path) => Some(path.ident.to_string()),
        syn::UseTree::Name(name) => Some(name.ident.to_string()),
        syn::UseTree::Rename(rename) => Some(rename.ident.to_string()),
        syn::UseTree::Glob(_) | syn::UseTree::Group(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        use std::collections::HashMap;
        use serde::Serialize;

        pub trait Greeter {
            fn greet(&self) -> String;
        }

        pub struct Registry {
            entries: HashMap<String, String>,
        }

        impl Registry {
            pub fn new() -> Self {
                Registry { entries: HashMap::new() }
            }

            pub fn insert(&mut self, key: String, value: String) {
                self.entries.insert(key, value);
            }
        }

        impl Greeter for Registry {
            fn greet(&self) -> String {
                "hello".to_string()
            }
        }

        pub fn lookup(registry: &Registry, key: &str) -> Option<String> {
            None
        }
    "#;

    #[test]
    fn extracts_classes_with_methods_and_bases() {
        let result = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();

        let registry = result
            .components
            .iter()
            .find(|c| c.name() == "Registry")
            .unwrap();
        match registry {
            Component::Class { methods, bases, .. } => {
                assert_eq!(methods, &["new", "insert", "greet"]);
                assert_eq!(bases, &["Greeter"]);
            }
            _ => panic!("Registry should be a class component"),
        }
    }

    #[test]
    fn extracts_free_functions_with_parameters() {
        let result = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();

        let lookup = result
            .components
            .iter()
            .find(|c| c.name() == "lookup")
            .unwrap();
        match lookup {
            Component::Function { parameters, .. } => {
                assert_eq!(parameters, &["registry", "key"]);
            }
            _ => panic!("lookup should be a function component"),
        }
    }

    #[test]
    fn use_declarations_become_import_relationships() {
        let result = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();

        let sources: Vec<_> = result
            .relationships
            .iter()
            .map(|r| r.source.as_str())
            .collect();
        assert_eq!(sources, vec!["std", "serde"]);
        assert!(result.relationships.iter().all(|r| r.kind == "import"));
    }

    #[test]
    fn traits_carry_their_own_methods() {
        let result = CodeAnalyzer::parse(SAMPLE).unwrap().analyze();

        let greeter = result
            .components
            .iter()
            .find(|c| c.name() == "Greeter")
            .unwrap();
        match greeter {
            Component::Class { methods, .. } => assert_eq!(methods, &["greet"]),
            _ => panic!("Greeter should be a class component"),
        }
    }

    #[test]
    fn rejects_code_that_does_not_parse() {
        assert!(CodeAnalyzer::parse("fn broken(").is_err());
    }
}
