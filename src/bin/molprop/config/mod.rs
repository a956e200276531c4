mod dataset;
mod file;
mod train;

pub use dataset::build_dataset_config;
pub use file::ConfigFile;
pub use train::build_train_config;
