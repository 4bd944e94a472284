//! Integration tests: feed → engine → dashboard, with an in-memory source.

mod mock_source;
mod pipeline;
