//! Shared byte-level encoding for values and schemas, used by both the WAL
//! entry format and the snapshot format (§6: value payload tags are
//! binding across both — `1 = Int64`, `2 = Float64`, `3 = String`,
//! `4 = Bool`).

use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use coleman_core::{ColumnDef, ColumnType, Schema, Value};
use std::io::{Read, Write};

pub const VALUE_TAG_INT64: u8 = 1;
pub const VALUE_TAG_FLOAT64: u8 = 2;
pub const VALUE_TAG_STRING: u8 = 3;
pub const VALUE_TAG_BOOL: u8 = 4;

pub fn write_value<W: Write>(w: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::Int64(v) => {
            w.write_u8(VALUE_TAG_INT64)?;
            w.write_i64::<LittleEndian>(*v)?;
        }
        Value::Float64(v) => {
            w.write_u8(VALUE_TAG_FLOAT64)?;
            w.write_u64::<LittleEndian>(v.to_bits())?;
        }
        Value::String(v) => {
            w.write_u8(VALUE_TAG_STRING)?;
            write_bytes(w, v.as_bytes())?;
        }
        Value::Bool(v) => {
            w.write_u8(VALUE_TAG_BOOL)?;
            w.write_u8(if *v { 1 } else { 0 })?;
        }
    }
    Ok(())
}

pub fn read_value<R: Read>(r: &mut R) -> Result<Value> {
    let tag = r.read_u8()?;
    match tag {
        VALUE_TAG_INT64 => Ok(Value::Int64(r.read_i64::<LittleEndian>()?)),
        VALUE_TAG_FLOAT64 => Ok(Value::Float64(f64::from_bits(
            r.read_u64::<LittleEndian>()?,
        ))),
        VALUE_TAG_STRING => {
            let bytes = read_bytes(r)?;
            Ok(Value::String(
                String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8(e.to_string()))?,
            ))
        }
        VALUE_TAG_BOOL => Ok(Value::Bool(r.read_u8()? != 0)),
        other => Err(Error::InvalidValueTypeTag(other)),
    }
}

pub fn write_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    w.write_u32::<LittleEndian>(bytes.len() as u32)?;
    w.write_all(bytes)?;
    Ok(())
}

pub fn read_bytes<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let len = r.read_u32::<LittleEndian>()? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn write_string<W: Write>(w: &mut W, s: &str) -> Result<()> {
    write_bytes(w, s.as_bytes())
}

pub fn read_string<R: Read>(r: &mut R) -> Result<String> {
    let bytes = read_bytes(r)?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8(e.to_string()))
}

pub fn write_schema<W: Write>(w: &mut W, schema: &Schema) -> Result<()> {
    w.write_u32::<LittleEndian>(schema.column_count() as u32)?;
    for col in schema.columns() {
        write_string(w, &col.name)?;
        w.write_u8(col.column_type.disk_tag())?;
    }
    Ok(())
}

pub fn read_schema<R: Read>(r: &mut R) -> Result<Schema> {
    let col_count = r.read_u32::<LittleEndian>()? as usize;
    let mut columns = Vec::with_capacity(col_count);
    for _ in 0..col_count {
        let name = read_string(r)?;
        let tag = r.read_u8()?;
        let column_type =
            ColumnType::from_disk_tag(tag).ok_or(Error::InvalidColumnTypeTag(tag))?;
        columns.push(ColumnDef::new(name, column_type));
    }
    Ok(Schema::new(columns))
}
