pub mod google;

pub use google::GoogleSearchProvider;
