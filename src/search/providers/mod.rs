mod brave;
mod duckduckgo;

pub use brave::BraveSearchProvider;
pub use duckduckgo::DuckDuckGoProvider;
