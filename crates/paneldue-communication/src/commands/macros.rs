//! Macro catalog shown in the panel's macro directory.

use paneldue_core::CommandInterpreter;

/// Virtual directory the panel browses for macros
pub const MACRO_DIRECTORY: &str = "0:/macros";

/// Ordered, de-duplicated set of macro names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroCatalog {
    names: Vec<String>,
}

impl MacroCatalog {
    /// Build from explicit names, keeping first occurrences in order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            let name = name.into();
            if !catalog.names.contains(&name) {
                catalog.names.push(name);
            }
        }
        catalog
    }

    /// Discover macros from the interpreter's registered commands.
    ///
    /// Plain G/M/T codes are not macros; every other registered name is.
    pub fn discover(interpreter: &dyn CommandInterpreter) -> Self {
        let mut names: Vec<String> = interpreter
            .command_names()
            .into_iter()
            .filter(|name| !is_numbered_code(name))
            .collect();
        names.sort();
        Self::new(names)
    }

    /// Use the configured list when present, otherwise discover
    pub fn from_config(configured: Option<&[String]>, interpreter: &dyn CommandInterpreter) -> Self {
        let catalog = match configured {
            Some(names) => Self::new(names.iter().cloned()),
            None => Self::discover(interpreter),
        };
        tracing::info!("Macro catalog: {:?}", catalog.names);
        catalog
    }

    /// Macro names in catalog order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of macros
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn is_numbered_code(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(letter) if matches!(letter.to_ascii_uppercase(), 'G' | 'M' | 'T') => {
            let rest = chars.as_str();
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit() || c == '.')
        }
        _ => false,
    }
}
