//! fc-remove core
//!
//! 削除対象のデプロイメント記述・認証情報・削除リクエストのモデルと、
//! s.yaml ローダーを提供します。

pub mod error;
pub mod loader;
pub mod model;

pub use error::{CoreError, Result};
pub use loader::{Project, load_project, parse_project_str};
pub use model::*;
