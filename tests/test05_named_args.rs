use tempfile::tempdir;
use yoda_db::prelude::*;

fn all_rows(db: &YodaDb) -> Result<Vec<Vec<RowValues>>, YodaDbError> {
    let rows = db.read_row(ReadRow::all())?.collect_rows()?;
    Ok(rows.into_iter().map(Row::into_values).collect())
}

#[test]
fn named_arguments_drive_every_shortcut() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = YodaDb::open(dir.path().join("class.db").to_string_lossy(), "students")?;
    db.create_table(&["StudentName", "StudentID", "Grade"], false)?
        .into_result()?;

    db.insert_row(InsertRow::try_from(
        NamedArgs::new().with_list("values", ["Princess Leia", "1", "A"]),
    )?)?;
    db.insert_row(InsertRow::try_from(
        NamedArgs::new()
            .with_list("values", ["R2-D2", "4"])
            .with_list("for_columns", ["StudentName", "StudentID"]),
    )?)?;
    db.update_row(UpdateRow::try_from(
        NamedArgs::new()
            .with("where_column", "StudentName")
            .with("equals", "Princess Leia")
            .with("set_column", "Grade")
            .with("to_value", "F"),
    )?)?;

    let read = ReadRow::try_from(
        NamedArgs::new()
            .with("where_column", "StudentName")
            .with("equals", "Princess Leia")
            .with_list("return_columns", ["Grade"]),
    )?;
    let grades = db.read_row(read)?.collect_rows()?;
    assert_eq!(grades[0].values(), [RowValues::Text("F".into())]);

    db.delete_row(DeleteRow::try_from(
        NamedArgs::new()
            .with("where_column", "StudentName")
            .with("equals", "R2-D2"),
    )?)?;
    assert_eq!(all_rows(&db)?.len(), 1);
    Ok(())
}

#[test]
fn misshapen_arguments_fail_without_mutation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut db = YodaDb::open(dir.path().join("class.db").to_string_lossy(), "students")?;
    db.create_table(&["StudentName", "StudentID", "Grade"], false)?
        .into_result()?;
    db.insert_row(InsertRow::values(["Han Solo", "2", "B"]))?;
    let before = all_rows(&db)?;

    // right count, wrong names
    let update = UpdateRow::try_from(
        NamedArgs::new()
            .with("where_column", "StudentName")
            .with("equals", "Han Solo")
            .with("setColumn", "Grade")
            .with("to_value", "F"),
    );
    assert!(matches!(update, Err(YodaDbError::ArgumentsError(_))));

    let delete = DeleteRow::try_from(NamedArgs::new().with("where_column", "StudentName"));
    assert!(matches!(delete, Err(YodaDbError::ArgumentsError(_))));

    let insert = InsertRow::try_from(NamedArgs::new());
    assert!(matches!(insert, Err(YodaDbError::ArgumentsError(_))));

    // a well-typed request with mismatched lengths is refused by the facade
    assert!(matches!(
        db.insert_row(InsertRow::values(["Chewbacca"]).for_columns(["StudentName", "Grade"])),
        Err(YodaDbError::ArgumentsError(_))
    ));
    assert!(matches!(
        db.read_row(ReadRow::filter("StudentName", "Han Solo").returning(Vec::<String>::new())),
        Err(YodaDbError::ArgumentsError(_))
    ));

    assert_eq!(all_rows(&db)?, before);
    Ok(())
}
