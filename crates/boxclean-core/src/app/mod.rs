//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて削除の判断と実行を行います。
//!
//! # 主要コンポーネント
//! - **Cleaner**: レジストリの走査とリテンション判定
//! - **Executor**: 削除（または dry-run でのログ出力）

pub mod cleaner;
pub mod executor;

pub use self::cleaner::{CleanReport, Cleaner};
pub use self::executor::{Executor, Removal};
