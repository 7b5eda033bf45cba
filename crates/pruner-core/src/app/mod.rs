//! App - アプリケーション層
//!
//! ports を組み合わせて剪定ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **LivenessProbe**: 回収パスが起きたかを判定
//! - **PruneRegistry**: 登録順の剪定対象リスト（重複可）
//! - **Pruner**: tick ごとに probe を確認し、必要なときだけ剪定
//! - **PrunerBuilder**: ports のワイヤリング
//! - **PrunerStats**: 統計のスナップショット

pub mod builder;
pub mod probe;
pub mod pruner;
pub mod registry;
pub mod status;

pub use self::builder::PrunerBuilder;
pub use self::probe::LivenessProbe;
pub use self::pruner::Pruner;
pub use self::registry::PruneRegistry;
pub use self::status::PrunerStats;
