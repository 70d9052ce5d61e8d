pub mod csv;
pub mod encode;
pub mod normalize;
pub mod split;

pub use csv::{parse_table, read_table, Table};
pub use encode::{encode, EncodeOptions, EncodedDataset};
pub use normalize::MinMaxScaler;
pub use split::{stratified_split, Split};
