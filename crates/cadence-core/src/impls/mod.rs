//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryTaskStore**: 開発・テスト用の正本
//!
//! # 本番用実装
//! 本番用のストアは別クレートに配置します（行ロック/条件付き UPDATE を
//! 持つ SQL ストアなど）。

pub mod memory;

pub use self::memory::InMemoryTaskStore;
