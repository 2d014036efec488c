//! Markdown plugin table

use serde_yaml_ng::Value;

use crate::catalog::CatalogError;
use crate::manifest::Manifest;

const HEADER: &str = "
| | Name | Author | Description |
|-|------|--------|-------------|";

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub url: String,
    pub authors: String,
    pub short_description: String,
    pub icon_url: String,
}

impl TableRow {
    /// Extract a row from the manifest at position `index` of the index.
    pub fn from_manifest(
        index: usize,
        manifest: &Manifest,
        default_icon_url: &str,
    ) -> Result<Self, CatalogError> {
        let field = |name: &'static str| {
            manifest
                .get_str(name)
                .map(str::to_string)
                .ok_or(CatalogError::MissingField { index, field: name })
        };

        Ok(Self {
            name: field("name")?,
            url: field("url")?,
            authors: authors(index, manifest)?,
            short_description: clean_description(&field("shortDescription")?),
            icon_url: manifest
                .get_str("iconUrl")
                .unwrap_or(default_icon_url)
                .to_string(),
        })
    }

    fn render(&self) -> String {
        format!(
            "\n| ![Icon]({}) | [{}]({}) | {} | {} |",
            self.icon_url, self.name, self.url, self.authors, self.short_description
        )
    }
}

fn authors(index: usize, manifest: &Manifest) -> Result<String, CatalogError> {
    let invalid = CatalogError::InvalidField {
        index,
        field: "authors",
    };

    match manifest.get("authors") {
        None => Err(CatalogError::MissingField {
            index,
            field: "authors",
        }),
        Some(Value::String(authors)) => Ok(authors.clone()),
        Some(Value::Sequence(names)) => names
            .iter()
            .map(|name| name.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(|names| names.join(", "))
            .ok_or(invalid),
        Some(_) => Err(invalid),
    }
}

fn clean_description(description: &str) -> String {
    description
        .replace('\n', " ")
        .replace('\r', "")
        .trim()
        .to_string()
}

/// Render the plugin table, rows sorted by name
pub fn render_table(plugins: &[Manifest], default_icon_url: &str) -> Result<String, CatalogError> {
    let mut rows = plugins
        .iter()
        .enumerate()
        .map(|(index, manifest)| TableRow::from_manifest(index, manifest, default_icon_url))
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let mut buffer = HEADER.to_string();
    for row in &rows {
        buffer.push_str(&row.render());
    }
    Ok(buffer)
}
