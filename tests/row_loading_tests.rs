/// Row loading tests
///
/// Materializing entities from result sets and reading them back
/// Run with: cargo test --test row_loading_tests

use chrono::{NaiveDate, TimeZone, Utc};
use rowmap::{
    CachedReflectionStrategy, DirectReflectionStrategy, MapError, QueryResult, Reflect,
    ReflectionStrategy, RowLoader, TypeBuilder, Value,
};
use uuid::Uuid;

#[derive(Debug, Default, PartialEq)]
struct Employee {
    id: Uuid,
    name: String,
    salary: f64,
    manager_id: Option<i64>,
    hired_on: NaiveDate,
    active: bool,
    updated_at: chrono::DateTime<Utc>,
}

impl Reflect for Employee {
    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .field("id", |e: &Employee| &e.id, |e: &mut Employee| &mut e.id)
            .field("name", |e: &Employee| &e.name, |e: &mut Employee| &mut e.name)
            .field("salary", |e: &Employee| &e.salary, |e: &mut Employee| &mut e.salary)
            .field(
                "manager_id",
                |e: &Employee| &e.manager_id,
                |e: &mut Employee| &mut e.manager_id,
            )
            .field("hired_on", |e: &Employee| &e.hired_on, |e: &mut Employee| &mut e.hired_on)
            .field("active", |e: &Employee| &e.active, |e: &mut Employee| &mut e.active)
            .field(
                "updated_at",
                |e: &Employee| &e.updated_at,
                |e: &mut Employee| &mut e.updated_at,
            )
            .readonly_property("display_name", |e: &Employee| format!("#{} {}", e.id, e.name))
            .constructible()
    }
}

fn columns() -> Vec<String> {
    ["id", "name", "salary", "manager_id", "hired_on", "active", "updated_at"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[test]
fn test_load_rows_with_nulls() {
    let id = Uuid::new_v4();
    let result = QueryResult::new(
        columns(),
        vec![
            vec![
                Value::Text(id.to_string()),
                Value::from("Ada"),
                Value::Integer(120_000),
                Value::Integer(7),
                Value::from("2021-03-15"),
                Value::Integer(1),
                Value::from("2024-01-02T03:04:05Z"),
            ],
            vec![
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
            ],
        ],
    );

    let strategy = CachedReflectionStrategy::new();
    let employees = RowLoader::new(&strategy).load::<Employee>(&result).unwrap();

    assert_eq!(employees.len(), 2);
    let ada = &employees[0];
    assert_eq!(ada.id, id);
    assert_eq!(ada.name, "Ada");
    assert_eq!(ada.salary, 120_000.0);
    assert_eq!(ada.manager_id, Some(7));
    assert_eq!(ada.hired_on, NaiveDate::from_ymd_opt(2021, 3, 15).unwrap());
    assert!(ada.active);
    assert_eq!(ada.updated_at, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

    assert_eq!(employees[1], Employee::default());
}

#[test]
fn test_read_only_column_is_ignored_on_load() {
    let result = QueryResult::new(
        vec!["name".into(), "display_name".into()],
        vec![vec![Value::from("Grace"), Value::from("ignored")]],
    );

    let strategy = DirectReflectionStrategy::new();
    let loader = RowLoader::new(&strategy);
    let employees = loader.load::<Employee>(&result).unwrap();

    assert_eq!(employees[0].name, "Grace");
    assert_eq!(
        strategy.get_field_value(&employees[0], "display_name").unwrap(),
        Value::Text(format!("#{} Grace", Uuid::nil()))
    );
}

#[test]
fn test_bad_column_value_aborts_load() {
    let result = QueryResult::new(
        vec!["name".into(), "hired_on".into()],
        vec![vec![Value::from("Linus"), Value::from("15/03/2021")]],
    );

    let strategy = CachedReflectionStrategy::new();
    let err = RowLoader::new(&strategy).load::<Employee>(&result).unwrap_err();

    match err {
        MapError::DataMapping { field, details, .. } => {
            assert_eq!(field, "hired_on");
            assert!(details.contains("invalid date"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_extract_round_trips_through_load() {
    let strategy = CachedReflectionStrategy::new();
    let loader = RowLoader::new(&strategy);
    let original = vec![
        Employee {
            name: "Barbara".into(),
            salary: 99.5,
            active: true,
            ..Employee::default()
        },
        Employee {
            name: "Ken".into(),
            manager_id: Some(1),
            ..Employee::default()
        },
    ];

    let result = loader
        .extract(&original, &["name", "salary", "manager_id", "active", "display_name"])
        .unwrap();
    assert_eq!(result.row_count(), 2);
    assert_eq!(result.rows[1][2], Value::Integer(1));
    assert_eq!(result.rows[0][2], Value::Null);

    let writable = QueryResult::new(
        result.columns[..4].to_vec(),
        result.rows.iter().map(|row| row[..4].to_vec()).collect(),
    );
    let reloaded = loader.load::<Employee>(&writable).unwrap();
    assert_eq!(reloaded, original);
}
