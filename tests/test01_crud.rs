use tempfile::{TempDir, tempdir};
use yoda_db::prelude::*;

fn open_students(dir: &TempDir) -> Result<YodaDb, YodaDbError> {
    let path = dir.path().join("class.db");
    YodaDb::open(path.to_string_lossy(), "students")
}

fn read_values(db: &YodaDb, request: ReadRow) -> Result<Vec<Vec<RowValues>>, YodaDbError> {
    let rows = db.read_row(request)?.collect_rows()?;
    Ok(rows.into_iter().map(Row::into_values).collect())
}

fn row(values: &[Option<&str>]) -> Vec<RowValues> {
    values.iter().map(|v| RowValues::from(*v)).collect()
}

fn seed(db: &mut YodaDb) -> Result<(), YodaDbError> {
    db.create_table(&["StudentName", "StudentID", "Grade"], true)?
        .into_result()?;
    db.insert_row(InsertRow::values(["Princess Leia", "1", "A"]))?;
    db.insert_row(InsertRow::values(["Han Solo", "2", "B"]))?;
    db.insert_row(InsertRow::values(["Chewbacca", "3", "B"]))?;
    db.insert_row(
        InsertRow::values(["R2-D2", "4"]).for_columns(["StudentName", "StudentID"]),
    )?;
    Ok(())
}

#[test]
fn leia_and_solo_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    assert!(db.create_table(&["Name", "ID", "Grade"], false)?.is_created());
    db.insert_row(InsertRow::values(["Leia", "1", "A"]))?;
    db.insert_row(InsertRow::values(["Solo", "2", "B"]))?;

    assert_eq!(
        read_values(&db, ReadRow::filter("Name", "Leia"))?,
        vec![row(&[Some("Leia"), Some("1"), Some("A")])]
    );

    db.update_row(UpdateRow::new("Name", "Leia", "Grade", "F"))?;
    assert_eq!(
        read_values(&db, ReadRow::filter("Name", "Leia"))?,
        vec![row(&[Some("Leia"), Some("1"), Some("F")])]
    );

    db.delete_row(DeleteRow::new("Name", "Solo"))?;
    assert!(read_values(&db, ReadRow::filter("Name", "Solo"))?.is_empty());

    db.close()?;
    Ok(())
}

#[test]
fn full_read_preserves_insertion_order_and_defaults_missing_columns()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    seed(&mut db)?;

    assert_eq!(
        read_values(&db, ReadRow::all())?,
        vec![
            row(&[Some("Princess Leia"), Some("1"), Some("A")]),
            row(&[Some("Han Solo"), Some("2"), Some("B")]),
            row(&[Some("Chewbacca"), Some("3"), Some("B")]),
            row(&[Some("R2-D2"), Some("4"), None]),
        ]
    );
    Ok(())
}

#[test]
fn filter_returns_only_matching_rows_in_requested_columns()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    seed(&mut db)?;

    let graded_b = read_values(&db, ReadRow::filter("Grade", "B"))?;
    assert_eq!(graded_b.len(), 2);
    assert!(graded_b.iter().all(|r| r[2] == RowValues::Text("B".into())));

    let projected = read_values(
        &db,
        ReadRow::filter("StudentName", "Han Solo").returning(["StudentID", "StudentName"]),
    )?;
    assert_eq!(projected, vec![row(&[Some("2"), Some("Han Solo")])]);

    assert!(read_values(&db, ReadRow::filter("StudentName", "Yoda"))?.is_empty());
    Ok(())
}

#[test]
fn update_and_delete_leave_other_rows_alone() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    seed(&mut db)?;

    let changed = db.update_row(UpdateRow::new("StudentName", "Princess Leia", "Grade", "F"))?;
    assert_eq!(changed, 1);
    assert_eq!(
        read_values(&db, ReadRow::filter("StudentName", "Han Solo"))?,
        vec![row(&[Some("Han Solo"), Some("2"), Some("B")])]
    );

    let removed = db.delete_row(DeleteRow::new("Grade", "B"))?;
    assert_eq!(removed, 2);
    let names: Vec<RowValues> = read_values(&db, ReadRow::all())?
        .into_iter()
        .map(|mut r| r.remove(0))
        .collect();
    assert_eq!(names, vec!["Princess Leia".into(), "R2-D2".into()]);
    Ok(())
}

#[test]
fn filter_values_are_bound_not_spliced() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    seed(&mut db)?;

    assert!(read_values(&db, ReadRow::filter("StudentName", "x' OR '1'='1"))?.is_empty());
    assert_eq!(db.delete_row(DeleteRow::new("StudentName", "x' OR '1'='1"))?, 0);
    assert_eq!(read_values(&db, ReadRow::all())?.len(), 4);
    Ok(())
}

#[test]
fn cursor_is_single_pass() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    seed(&mut db)?;

    let mut cursor = db.read_row(ReadRow::all())?;
    assert_eq!(cursor.column_names(), ["StudentName", "StudentID", "Grade"]);
    let first: Vec<Row> = cursor.rows()?.take(1).collect::<Result<_, _>>()?;
    assert_eq!(first.len(), 1);
    assert!(cursor.is_started());
    // the rows left over from the first pass are gone
    assert_eq!(cursor.rows()?.count(), 0);
    drop(cursor);

    // a new read starts over
    let mut again = db.read_row(ReadRow::all())?;
    assert!(!again.is_started());
    assert_eq!(again.rows()?.count(), 4);
    Ok(())
}

#[test]
fn record_rows_are_addressable_by_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = TableOptionsBuilder::new()
        .filename(dir.path().join("class.db").to_string_lossy())
        .tablename("students")
        .row_format(RowFormat::Record)
        .open()?;
    seed(&mut db)?;

    let rows = db.read_row(ReadRow::filter("StudentName", "R2-D2"))?.collect_rows()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("StudentID"), Some(&RowValues::Text("4".into())));
    assert_eq!(rows[0].get("Grade"), Some(&RowValues::Null));
    assert_eq!(
        rows[0].to_json(),
        serde_json::json!({"StudentName": "R2-D2", "StudentID": "4", "Grade": null})
    );

    db.set_row_format(RowFormat::Tuple);
    let rows = db.read_row(ReadRow::all())?.collect_rows()?;
    assert!(rows.iter().all(|r| r.as_record().is_none()));
    Ok(())
}

#[test]
fn fetch_all_keeps_column_names() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = open_students(&dir)?;
    seed(&mut db)?;

    let result = db.fetch_all(ReadRow::filter("Grade", "B").returning(["StudentName"]))?;
    assert_eq!(result.column_names(), ["StudentName"]);
    assert_eq!(result.len(), 2);
    let names: Vec<&RowValues> = result.iter().map(|r| &r.values()[0]).collect();
    assert_eq!(
        names,
        vec![
            &RowValues::Text("Han Solo".into()),
            &RowValues::Text("Chewbacca".into())
        ]
    );
    Ok(())
}

#[test]
fn typed_columns_and_binding_conversions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = YodaDb::open(dir.path().join("typed.db").to_string_lossy(), "events")?;
    db.create_table(
        &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "active BOOLEAN",
            "at TEXT",
            "doc TEXT",
            "score REAL",
        ],
        false,
    )?
    .into_result()?;

    let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 4)
        .and_then(|d| d.and_hms_opt(8, 15, 0))
        .ok_or("bad date")?;
    db.insert_row(
        InsertRow::values(vec![
            RowValues::Bool(true),
            RowValues::Timestamp(at),
            RowValues::JSON(serde_json::json!({"k": [1, 2]})),
            RowValues::Float(9.5),
        ])
        .for_columns(["active", "at", "doc", "score"]),
    )?;

    let rows = read_values(&db, ReadRow::filter("id", 1))?;
    assert_eq!(rows.len(), 1);
    let values = &rows[0];
    assert_eq!(values[0], RowValues::Int(1));
    assert_eq!(values[1].as_bool(), Some(true));
    assert_eq!(values[2].as_timestamp(), Some(at));
    assert_eq!(values[3], RowValues::Text("{\"k\":[1,2]}".into()));
    assert_eq!(values[4].as_float(), Some(9.5));
    Ok(())
}
