//! Table schema: an ordered, immutable list of named, typed columns.

use crate::{ColumnType, Error, Result};

/// One named, typed column declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered sequence of column declarations, immutable once attached to a
/// table. Name uniqueness is assumed by callers, not enforced here (§4.1):
/// `find` returns the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Build a schema, taking ownership of the column definitions.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Schema { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// First-match lookup by column name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_type(&self, index: usize) -> Result<ColumnType> {
        self.columns
            .get(index)
            .map(|c| c.column_type)
            .ok_or(Error::ColumnIndexOutOfBounds {
                index,
                len: self.columns.len(),
            })
    }

    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.columns
            .get(index)
            .map(|c| c.name.as_str())
            .ok_or(Error::ColumnIndexOutOfBounds {
                index,
                len: self.columns.len(),
            })
    }

    /// Parse the `"name:type,name:type"` form produced by `to_string`.
    pub fn from_string(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Schema::new(Vec::new()));
        }
        let mut columns = Vec::with_capacity(s.matches(',').count() + 1);
        for field in s.split(',') {
            let (name, ty) = field
                .split_once(':')
                .ok_or_else(|| Error::InvalidColumnTypeToken(field.to_string()))?;
            let column_type = ColumnType::from_token(ty)
                .ok_or_else(|| Error::InvalidColumnTypeToken(ty.to_string()))?;
            columns.push(ColumnDef::new(name, column_type));
        }
        Ok(Schema::new(columns))
    }

    /// Serialize to the `"name:type,name:type"` form parsed by `from_string`.
    pub fn to_string(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.column_type.token()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new(vec![
            ColumnDef::new("id", ColumnType::Int64),
            ColumnDef::new("name", ColumnType::String),
            ColumnDef::new("score", ColumnType::Float64),
        ])
    }

    #[test]
    fn find_is_first_match() {
        let schema = sample();
        assert_eq!(schema.find("name"), Some(1));
        assert_eq!(schema.find("missing"), None);
    }

    #[test]
    fn column_type_out_of_bounds() {
        let schema = sample();
        assert!(matches!(
            schema.column_type(10),
            Err(Error::ColumnIndexOutOfBounds { index: 10, len: 3 })
        ));
    }

    #[test]
    fn string_round_trip() {
        let schema = sample();
        let s = schema.to_string();
        assert_eq!(s, "id:int64,name:string,score:float64");
        assert_eq!(Schema::from_string(&s).unwrap(), schema);
    }

    #[test]
    fn structural_equality_ignores_nothing() {
        let a = Schema::new(vec![ColumnDef::new("id", ColumnType::Int64)]);
        let b = Schema::new(vec![ColumnDef::new("id", ColumnType::Float64)]);
        assert_ne!(a, b);
    }
}
