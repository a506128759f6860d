mod error;
mod input;
mod output;

pub use error::TableError;
pub use input::parse_request;
pub use output::{read_table, read_table_file, write_table, write_table_file, TableRow, HEADER};
