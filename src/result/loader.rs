use tracing::debug;

use super::QueryResult;
use crate::core::{MapError, Result, Row};
use crate::reflect::{Reflect, create_instance};
use crate::strategy::ReflectionStrategy;

/// Moves rows in and out of entities, one member per column.
///
/// Column names are used as member names verbatim.
pub struct RowLoader<'a, S: ReflectionStrategy + ?Sized> {
    strategy: &'a S,
}

impl<'a, S: ReflectionStrategy + ?Sized> RowLoader<'a, S> {
    pub fn new(strategy: &'a S) -> Self {
        Self { strategy }
    }

    /// Creates one `T` per row and writes every column into it.
    pub fn load<T: Reflect>(&self, result: &QueryResult) -> Result<Vec<T>> {
        let mut entities = Vec::with_capacity(result.row_count());

        for (index, row) in result.rows.iter().enumerate() {
            if row.len() != result.columns.len() {
                return Err(MapError::RowShape {
                    row: index,
                    values: row.len(),
                    columns: result.columns.len(),
                });
            }

            let mut entity = create_instance::<T>()?;
            for (column, value) in result.columns.iter().zip(row) {
                self.strategy.set_field_value(&mut entity, column, value.clone())?;
            }
            entities.push(entity);
        }

        debug!(rows = entities.len(), "loaded entities from query result");
        Ok(entities)
    }

    /// Reads `columns` from every entity into a result set.
    pub fn extract<T: Reflect>(&self, entities: &[T], columns: &[&str]) -> Result<QueryResult> {
        let rows = entities
            .iter()
            .map(|entity| {
                columns
                    .iter()
                    .map(|column| self.strategy.get_field_value(entity, column))
                    .collect::<Result<Row>>()
            })
            .collect::<Result<Vec<Row>>>()?;

        Ok(QueryResult::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::reflect::TypeBuilder;
    use crate::strategy::DirectReflectionStrategy;

    #[derive(Default)]
    struct Tag {
        name: String,
    }

    impl Reflect for Tag {
        fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
            builder
                .field("name", |t: &Tag| &t.name, |t: &mut Tag| &mut t.name)
                .constructible()
        }
    }

    #[test]
    fn test_short_row_is_rejected() {
        let strategy = DirectReflectionStrategy::new();
        let loader = RowLoader::new(&strategy);
        let result = QueryResult::new(vec!["name".into()], vec![vec![]]);

        assert!(matches!(
            loader.load::<Tag>(&result),
            Err(MapError::RowShape { row: 0, values: 0, columns: 1 })
        ));
    }

    #[test]
    fn test_empty_result_loads_nothing() {
        let strategy = DirectReflectionStrategy::new();
        let tags = RowLoader::new(&strategy).load::<Tag>(&QueryResult::empty()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_extract() {
        let strategy = DirectReflectionStrategy::new();
        let tags = vec![Tag { name: "a".into() }, Tag { name: "b".into() }];

        let result = RowLoader::new(&strategy).extract(&tags, &["name"]).unwrap();
        assert_eq!(result.column_index("name"), Some(0));
        assert_eq!(result.rows, vec![vec![Value::from("a")], vec![Value::from("b")]]);
    }
}
