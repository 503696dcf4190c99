use instcount_studio::aggregator::{sum_by_category, sum_by_function, IdentifierOptions};
use instcount_studio::parser::{load_table, CsvLayout};
use instcount_studio::utils::error::LoadError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_end_to_end_scenario() {
    let file = write_csv(
        "Tipo_Instruccion,Conteo,Funcion_Actual\n\
         ADD,3,foo\n\
         MUL,7,bar\n\
         ADD,2,foo\n\
         XOR,0,baz\n",
    );

    let table = load_table(file.path(), None).unwrap();

    // The zero-count row is dropped
    assert_eq!(table.records.len(), 3);
    assert_eq!(table.stats.rows_read, 4);
    assert_eq!(table.stats.rows_dropped, 1);

    let categories = sum_by_category(&table.records);
    assert_eq!(
        categories,
        vec![("MUL".to_string(), 7), ("ADD".to_string(), 5)]
    );

    let functions = sum_by_function(&table.records, &IdentifierOptions::default());
    assert_eq!(
        functions,
        vec![("bar".to_string(), 7), ("foo".to_string(), 5)]
    );
}

#[test]
fn test_tab_delimited_input() {
    let file = write_csv(
        "Tipo_Instruccion\tConteo\tFuncion_Actual\tFuncion_Padre_1\n\
         ADD\t3\tfoo\tmain\n",
    );

    let table = load_table(file.path(), None).unwrap();

    assert_eq!(table.delimiter, '\t');
    assert_eq!(table.columns.parent_levels(), 1);
    assert_eq!(table.records[0].parents, vec!["main".to_string()]);
}

#[test]
fn test_semicolon_delimited_input() {
    let file = write_csv(
        "Tipo_Instruccion;Conteo;Funcion_Actual\n\
         ADD;3;foo\n",
    );

    let table = load_table(file.path(), None).unwrap();
    assert_eq!(table.delimiter, ';');
}

#[test]
fn test_missing_columns_are_fatal_and_named() {
    let file = write_csv("Tipo_Instruccion,Funcion_Actual\nADD,foo\n");

    let err = load_table(file.path(), None).unwrap_err();
    match err {
        LoadError::MissingColumns(cols) => assert_eq!(cols, vec!["Conteo".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_is_fatal() {
    let err = load_table(std::path::Path::new("/no/such/file.csv"), None).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_empty_file_is_fatal() {
    let file = write_csv("");
    let err = load_table(file.path(), None).unwrap_err();
    assert!(matches!(err, LoadError::EmptyInput(_)));
}

#[test]
fn test_all_rows_dropped_is_fatal() {
    let file = write_csv(
        "Tipo_Instruccion,Conteo,Funcion_Actual\n\
         ADD,zero,foo\n\
         MUL,0,bar\n",
    );

    let err = load_table(file.path(), None).unwrap_err();
    assert!(matches!(err, LoadError::NoValidRows { dropped: 2 }));
}

#[test]
fn test_explicit_fixed_layout() {
    let file = write_csv(
        "Tipo,Funcion,P1,P2,P3,Conteo\n\
         ADD,foo,a,b,c,5\n",
    );

    let table = load_table(file.path(), Some(CsvLayout::Fixed6)).unwrap();
    let record = &table.records[0];

    assert_eq!(record.instruction_type, "ADD");
    assert_eq!(record.current_function, "foo");
    assert_eq!(record.count, 5);
    assert_eq!(
        record.parents,
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn test_blank_lines_are_ignored() {
    let file = write_csv(
        "Tipo_Instruccion,Conteo,Funcion_Actual\n\
         \n\
         ADD,3,foo\n\
         \n",
    );

    let table = load_table(file.path(), None).unwrap();
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.stats.rows_dropped, 0);
}
