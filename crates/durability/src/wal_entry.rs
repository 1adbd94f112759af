//! WAL entry types and their binary encoding (§4.5).
//!
//! ```text
//! 0x01 CreateTable: tag | u32 name_len | name | u32 col_count | { u32 name_len | name | u8 col_type } * col_count
//! 0x02 AddRecord:    tag | u32 name_len | name | u32 value_count | { u8 value_tag | payload } * value_count
//! ```

use crate::encoding::{
    read_schema, read_string, read_value, write_schema, write_string, write_value,
};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use coleman_core::{Schema, Value};

pub const ENTRY_TAG_CREATE_TABLE: u8 = 0x01;
pub const ENTRY_TAG_ADD_RECORD: u8 = 0x02;

/// A logical mutation recorded in the WAL. Carries no timestamp; ordering
/// is by the log's sequence number (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum WalEntry {
    CreateTable {
        table_name: String,
        schema: Schema,
    },
    AddRecord {
        table_name: String,
        values: Vec<Value>,
    },
}

impl WalEntry {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            WalEntry::CreateTable { table_name, schema } => {
                buf.write_u8(ENTRY_TAG_CREATE_TABLE)?;
                write_string(&mut buf, table_name)?;
                write_schema(&mut buf, schema)?;
            }
            WalEntry::AddRecord { table_name, values } => {
                buf.write_u8(ENTRY_TAG_ADD_RECORD)?;
                write_string(&mut buf, table_name)?;
                buf.write_u32::<LittleEndian>(values.len() as u32)?;
                for v in values {
                    write_value(&mut buf, v)?;
                }
            }
        }
        Ok(buf)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut cursor: &[u8] = data;
        let tag = cursor.read_u8()?;
        match tag {
            ENTRY_TAG_CREATE_TABLE => {
                let table_name = read_string(&mut cursor)?;
                let schema = read_schema(&mut cursor)?;
                Ok(WalEntry::CreateTable { table_name, schema })
            }
            ENTRY_TAG_ADD_RECORD => {
                let table_name = read_string(&mut cursor)?;
                let value_count = cursor.read_u32::<LittleEndian>()? as usize;
                let mut values = Vec::with_capacity(value_count);
                for _ in 0..value_count {
                    values.push(read_value(&mut cursor)?);
                }
                Ok(WalEntry::AddRecord { table_name, values })
            }
            other => Err(Error::InvalidEntryType(other)),
        }
    }
}
