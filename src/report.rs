//! Plain-text reports for the `heaptrail` binary

use crate::constants::INFINITE_TICK;
use crate::events::decode::LoadReport;
use crate::history::{HeapBlock, HeapHistory, Tick};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_tick(tick: Tick) -> String {
    if tick == INFINITE_TICK {
        "live".to_string()
    } else {
        tick.to_string()
    }
}

/// Totals for a loaded trace
pub fn summary(history: &HeapHistory, load: &LoadReport) -> String {
    let diagnostics = history.diagnostics();
    let area = history.global_area();

    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec!["Records".to_string(), load.records.to_string()]);
    table.add_row(vec!["Skipped records".to_string(), load.skipped.to_string()]);
    table.add_row(vec!["Ticks".to_string(), history.current_tick().to_string()]);
    table.add_row(vec!["Blocks".to_string(), history.blocks().len().to_string()]);
    table.add_row(vec!["Live blocks".to_string(), history.live_block_count().to_string()]);
    table.add_row(vec![
        "Allocation conflicts".to_string(),
        diagnostics.allocation_conflicts.to_string(),
    ]);
    table.add_row(vec!["Free conflicts".to_string(), diagnostics.free_conflicts.to_string()]);
    table.add_row(vec!["Filtered events".to_string(), diagnostics.filtered_events.to_string()]);
    table.add_row(vec!["Distinct tags".to_string(), history.tag_count().to_string()]);
    if !area.is_empty() {
        table.add_row(vec![
            "Address range".to_string(),
            format!("0x{:x} - 0x{:x}", area.minimum_address, area.maximum_address),
        ]);
    }
    table.add_row(vec![
        "Tick range".to_string(),
        format!("{} - {}", area.minimum_tick, area.maximum_tick),
    ]);
    table.to_string()
}

/// Every logged conflict, in tick order
pub fn conflicts(history: &HeapHistory) -> Table {
    let mut table = new_table(vec!["Tick", "Address", "Kind"]);
    for conflict in history.conflicts() {
        table.add_row(vec![
            conflict.tick.to_string(),
            format!("0x{:x}", conflict.address),
            conflict.kind.to_string(),
        ]);
    }
    table
}

/// Timeline events, in tick order
pub fn timeline(history: &HeapHistory) -> Table {
    let mut table = new_table(vec!["Tick", "Color", "Label"]);
    for (tick, event) in history.timeline_events() {
        table.add_row(vec![
            tick.to_string(),
            event.color.to_string(),
            event.label.clone(),
        ]);
    }
    table
}

/// One-block description for point queries
pub fn describe_block(index: usize, block: &HeapBlock) -> String {
    let mut lines = vec![
        format!("block #{index}"),
        format!(
            "  address: 0x{:x} - 0x{:x} ({} bytes)",
            block.address,
            block.end_address(),
            block.size
        ),
        format!(
            "  ticks:   {} - {}",
            block.start_tick,
            format_tick(block.end_tick)
        ),
        format!("  alloc:   {:?}", &*block.alloc_tag),
    ];
    if let Some(tag) = &block.free_tag {
        lines.push(format!("  free:    {:?}", &**tag));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Color;

    fn sample_history() -> HeapHistory {
        let mut history = HeapHistory::new();
        history.record_allocate(0x1000, 16, "init", 0);
        history.record_allocate(0x1000, 16, "init", 0);
        history.record_event("warmup".to_string(), Color::default());
        history.record_free(0x1000, "teardown", 0);
        history.record_free(0x9000, "", 0);
        history
    }

    #[test]
    fn test_summary_lists_counts() {
        let history = sample_history();
        let load = LoadReport {
            records: 6,
            applied: 5,
            skipped: 1,
        };
        let text = summary(&history, &load);

        assert!(text.contains("Skipped records"));
        assert!(text.contains("Allocation conflicts"));
        assert!(text.contains("0x1000 - 0x1010"));
    }

    #[test]
    fn test_conflicts_and_timeline_tables() {
        let history = sample_history();

        let text = conflicts(&history).to_string();
        assert!(text.contains("double allocation"));
        assert!(text.contains("free of unknown address"));
        assert!(text.contains("0x9000"));

        let text = timeline(&history).to_string();
        assert!(text.contains("warmup"));
        assert!(text.contains("#B0B0B0"));
    }

    #[test]
    fn test_describe_block() {
        let history = sample_history();
        let text = describe_block(0, &history.blocks()[0]);

        assert!(text.starts_with("block #0"));
        assert!(text.contains("ticks:   1 - 3"));
        assert!(text.contains("\"teardown\""));
    }

    #[test]
    fn test_describe_live_block() {
        let mut history = HeapHistory::new();
        history.record_allocate(0x40, 0, "", 0);
        let text = describe_block(0, &history.blocks()[0]);

        assert!(text.contains("1 - live"));
        assert!(!text.contains("free:"));
    }
}
