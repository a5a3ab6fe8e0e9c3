// ==========================================
// 急诊就诊统计引擎 - 命令行入口
// ==========================================
// 用法:
//   ed-visit-analytics <rows.json> [year] [sort]
// 读取原始行 JSON 数组，输出该过滤状态下的仪表盘快照 (JSON)
// ==========================================

use anyhow::Context;
use ed_visit_analytics::api::{DashboardApi, DashboardFilter};
use ed_visit_analytics::config::ConfigManager;
use ed_visit_analytics::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let rows_path = args
        .next()
        .context("缺少参数: 原始行 JSON 文件路径")?;
    let filter = DashboardFilter {
        year: args.next(),
        sort_direction: args.next(),
        ..Default::default()
    };

    tracing::info!("急诊就诊统计引擎 v{}", ed_visit_analytics::VERSION);

    let manager = ConfigManager::load().context("配置加载失败")?;
    if let Some(path) = manager.source_path() {
        tracing::info!("使用配置文件: {}", path.display());
    }
    let api = DashboardApi::new(manager.into_config());

    let raw = std::fs::read_to_string(&rows_path)
        .with_context(|| format!("无法读取文件: {}", rows_path))?;
    let dq = api.import_json(&raw).context("记录导入失败")?;
    tracing::info!(
        total_rows = dq.summary.total_rows,
        warning = dq.summary.warning,
        info = dq.summary.info,
        "导入完成"
    );

    let snapshot = api.snapshot(&filter)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
