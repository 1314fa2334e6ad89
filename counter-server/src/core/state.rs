use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Notify;

use crate::availability::{AvailabilityService, watcher};
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::{self, SchemaCapabilities};
use crate::orders::{FeedBus, OrderBoard, board, promoter};

/// 服务器状态 - 持有所有服务的共享引用
///
/// AppState 是柜台节点的核心数据结构，在入口处构造后注入各层 —
/// 不存在模块级单例。使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | feed | FeedBus | 订单变更总线 |
/// | board | OrderBoard | 实时订单看板 |
/// | availability | Arc<AvailabilityService> | 营业状态聚合 |
/// | capabilities | Arc<SchemaCapabilities> | 可选列探测结果 |
/// | config_notify | Arc<Notify> | 设置变更后强制重估 |
#[derive(Clone)]
pub struct AppState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 订单变更总线
    pub feed: FeedBus,
    /// 实时订单看板
    pub board: OrderBoard,
    /// 营业状态聚合服务
    pub availability: Arc<AvailabilityService>,
    /// 可选列探测结果
    pub capabilities: Arc<SchemaCapabilities>,
    /// 设置变更通知（营业状态强制重估）
    pub config_notify: Arc<Notify>,
}

impl AppState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库连接池 + schema
    /// 2. 可选列探测
    /// 3. 变更总线、看板、营业状态服务
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database_url).await?;
        db::init_schema(&pool).await?;

        let capabilities = Arc::new(SchemaCapabilities::probe(&pool).await?);
        let feed = FeedBus::with_capacity(config.feed_capacity);
        let board = OrderBoard::new();
        let availability = Arc::new(AvailabilityService::new(pool.clone()));

        Ok(Self {
            config: config.clone(),
            pool,
            feed,
            board,
            availability,
            capabilities,
            config_notify: Arc::new(Notify::new()),
        })
    }

    /// 启动后台任务
    ///
    /// 必须在 HTTP 服务启动前调用。
    ///
    /// 启动的任务：
    /// - 营业状态轮询 (Periodic)
    /// - 倒计时扫描 (Periodic)
    /// - 看板监听器 (Listener)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let state = self.clone();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("availability_watcher", TaskKind::Periodic, async move {
            watcher::run(state, shutdown).await;
        });

        let state = self.clone();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("ready_promoter", TaskKind::Periodic, async move {
            promoter::run(state, shutdown).await;
        });

        let state = self.clone();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("board_listener", TaskKind::Listener, async move {
            board::run(state, shutdown).await;
        });

        tasks.log_summary();
    }

    /// 通知依赖配置的任务立即重估（营业状态轮询）
    pub fn notify_config_changed(&self) {
        self.config_notify.notify_waiters();
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory state for tests — no background tasks
    pub async fn for_tests() -> Self {
        let pool = db::open_in_memory().await;
        let capabilities = Arc::new(SchemaCapabilities::probe(&pool).await.unwrap());
        Self {
            config: Config::with_overrides("sqlite::memory:", 0),
            pool: pool.clone(),
            feed: FeedBus::new(),
            board: OrderBoard::new(),
            availability: Arc::new(AvailabilityService::new(pool)),
            capabilities,
            config_notify: Arc::new(Notify::new()),
        }
    }
}
