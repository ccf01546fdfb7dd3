use serde::{Deserialize, Serialize};

/// Ordered column names describing the shape of a row.
///
/// Column order is the single source of truth for aligning a header with its
/// rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        Header { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.names.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn push(&mut self, name: String) {
        self.names.push(name);
    }

    pub fn into_inner(self) -> Vec<String> {
        self.names
    }
}

impl<S: Into<String>> FromIterator<S> for Header {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Header::new(iter.into_iter().map(Into::into).collect())
    }
}

/// The fields of one record, aligned with a [`Header`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    pub fn new(fields: Vec<String>) -> Self {
        Row { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn push(&mut self, field: String) {
        self.fields.push(field);
    }

    pub fn into_inner(self) -> Vec<String> {
        self.fields
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A serialized value: a header and one row of the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub header: Header,
    pub row: Row,
}

/// Delimiter and quote character of a CSV document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for Format {
    fn default() -> Self {
        Format {
            delimiter: b',',
            quote: b'"',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_should_serialize_as_plain_list() -> Result<(), serde_json::Error> {
        let header: Header = ["item1", "item2", "Count"].into_iter().collect();
        assert_eq!(serde_json::to_string(&header)?, r#"["item1","item2","Count"]"#);

        let row: Row = serde_json::from_str(r#"["Spear","Sword","2"]"#)?;
        assert_eq!(row.get(1), Some("Sword"));
        assert_eq!(row.get(3), None);
        Ok(())
    }
}
