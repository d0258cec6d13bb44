pub mod generate;
pub mod ingest;
pub mod init;
pub mod search;
pub mod sections;
pub mod serve;
