//! Brew Counter Server - 自取咖啡下单后端
//!
//! # 架构概述
//!
//! 围绕订单生命周期与营业状态两条规则链构建：
//!
//! - **营业状态** (`availability`): 周营业时间 + 特殊日期覆盖 + 手动开关
//! - **订单** (`orders`): 五状态流转、变更流归约、倒计时自动就绪
//! - **数据库** (`db`): SQLite 存储、单号计数器、可选列探测
//! - **HTTP API** (`api`): 下单与后台管理接口
//!
//! # 模块结构
//!
//! ```text
//! counter-server/src/
//! ├── core/          # 配置、状态、任务、服务器装配
//! ├── availability/  # 营业时间评估与聚合
//! ├── orders/        # 状态机、变更流、看板
//! ├── db/            # 数据库层
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod availability;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use self::core::{AppState, Config};
pub use utils::{AppError, AppResult};
