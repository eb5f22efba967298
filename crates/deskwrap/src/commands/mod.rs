pub mod build;
pub mod convert;
pub mod generate;
pub mod init;
pub mod installer;
pub mod serve;
