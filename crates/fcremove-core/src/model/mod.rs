//! モデル定義
//!
//! 削除対象のデプロイメント記述、認証情報、削除リクエストを定義します。

mod credentials;
mod deployment;
mod request;

// Re-exports
pub use credentials::*;
pub use deployment::*;
pub use request::*;
