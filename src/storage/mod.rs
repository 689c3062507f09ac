pub mod catalog;
pub mod header;
pub mod lzf;
pub mod metadata;
pub mod reader;
pub mod record_source;

const YXDB_FILE_TYPE_PREFIX: &str = "Alteryx Database File";
const AMP_FILE_TYPE: &str = "Alteryx e2 Database file";

const FILE_ID_OFFSET: u64 = 64;
const META_INFO_SIZE_OFFSET: u64 = 80;
const NUM_RECORDS_OFFSET: u64 = 104;
