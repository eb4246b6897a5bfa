//! Thin file/writer conveniences over `rowsmith-export` (spec.md §6
//! [EXPANSION]: "writing to an in-memory buffer...so library consumers and
//! tests don't need a filesystem"), layered on top of the
//! string-returning `render_*` functions that do the real work.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Error;
use crate::generate::GenerationOutput;
use rowsmith_export::ExportError;

/// Render every generated table as one SQL file of `INSERT` statements, in
/// topological order (§6: "one file, concatenated `INSERT` statements").
pub fn export_sql_to_string(output: &GenerationOutput) -> String {
    rowsmith_export::render_sql_inserts(&output.schema, &output.table_order, &output.tables)
}

/// Write the SQL export to `path` (§6: "SQL file").
pub fn export_sql_to_file(output: &GenerationOutput, path: impl AsRef<Path>) -> Result<(), Error> {
    let sql = export_sql_to_string(output);
    write_file(path, sql.as_bytes())?;
    Ok(())
}

/// Write one `<dir>/<TableName>.csv` per table (§6: "CSV directory").
pub fn export_csv_to_dir(output: &GenerationOutput, dir: impl AsRef<Path>) -> Result<(), Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| {
        ExportError::Io { path: dir.display().to_string(), source }
    })?;
    for table_name in &output.table_order {
        let Some(generated) = output.tables.get(table_name) else { continue };
        let csv = rowsmith_export::render_csv(table_name, &output.schema, generated)?;
        write_file(dir.join(format!("{table_name}.csv")), csv.as_bytes())?;
    }
    Ok(())
}

/// Write one `<dir>/<TableName>.json` per table (§6: "JSON directory").
pub fn export_json_to_dir(output: &GenerationOutput, dir: impl AsRef<Path>) -> Result<(), Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| {
        ExportError::Io { path: dir.display().to_string(), source }
    })?;
    for table_name in &output.table_order {
        let Some(generated) = output.tables.get(table_name) else { continue };
        let json = rowsmith_export::render_json(table_name, &output.schema, generated)?;
        write_file(dir.join(format!("{table_name}.json")), json.as_bytes())?;
    }
    Ok(())
}

fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), Error> {
    let path = path.as_ref();
    let mut file = fs::File::create(path)
        .map_err(|source| ExportError::Io { path: path.display().to_string(), source })?;
    file.write_all(bytes)
        .map_err(|source| ExportError::Io { path: path.display().to_string(), source })?;
    Ok(())
}
