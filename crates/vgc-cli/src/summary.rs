use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::DataFrame;

use vgc_cli::types::{BuildResult, ExploreResult, ViewResult};
use vgc_ingest::polars_utils::any_to_string;
use vgc_model::SegmentKind;
use vgc_standards::LookupTables;

pub fn print_build_summary(result: &BuildResult) {
    let stats = &result.stats;
    if result.dry_run {
        println!("Dry run: nothing written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!("Lookups: {} ({})", result.lookups_origin, short_hash(&stats.lookups_sha256));
    println!("Duplicate keys: {}", stats.duplicate_key_policy);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("raw charts"),
        Cell::new(stats.original_row_count),
        Cell::new(stats.original_column_count),
    ]);
    table.add_row(vec![
        Cell::new("cleaned"),
        Cell::new(stats.cleaned_row_count),
        Cell::new(stats.cleaned_column_count),
    ]);
    table.add_row(vec![
        Cell::new("merged").add_attribute(Attribute::Bold),
        Cell::new(stats.merged_row_count).add_attribute(Attribute::Bold),
        Cell::new(stats.merged_column_count).add_attribute(Attribute::Bold),
    ]);
    for kind in SegmentKind::ALL {
        table.add_row(vec![
            Cell::new(format!("  -> {kind}")).fg(Color::DarkGrey),
            Cell::new(stats.view_count(kind)),
            dim_cell("-"),
        ]);
    }
    println!("{table}");

    let years = match stats.year_range {
        Some(range) => format!("{}-{}", range.min, range.max),
        None => "-".to_string(),
    };
    println!(
        "Years: {years}  Platforms: {}  Genres: {}  Publishers: {}",
        stats.platforms_count, stats.genres_count, stats.publishers_count
    );

    print_join_table(result);
    print_cleaning_table(result);
    print_artifact_table(result);
}

fn print_join_table(result: &BuildResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Join"),
        header_cell("Keys"),
        header_cell("Matched"),
        header_cell("Unmatched"),
        header_cell("Duplicate keys"),
        header_cell("Added rows"),
    ]);
    apply_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for join in &result.stats.joins {
        let keys = format!("{} = {}", join.left_key, join.right_key);
        if join.skipped {
            table.add_row(vec![
                dim_cell(&join.stage),
                dim_cell(keys),
                dim_cell("skipped"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
            continue;
        }
        table.add_row(vec![
            Cell::new(&join.stage),
            Cell::new(keys),
            Cell::new(join.matched_rows),
            count_cell(join.unmatched_rows, Color::Yellow),
            count_cell(join.duplicate_keys, Color::Yellow),
            count_cell(join.added_rows, Color::Yellow),
        ]);
    }
    println!("{table}");
}

fn print_cleaning_table(result: &BuildResult) {
    let report = &result.stats.cleaning;
    let mut rows: Vec<(String, usize)> = vec![
        ("unparsed release dates".to_string(), report.unparsed_dates),
        ("incomplete sales rows".to_string(), report.incomplete_sales_rows),
        ("critic scores filled".to_string(), report.filled_critic_scores),
        ("unmapped platforms".to_string(), report.unmapped_platforms),
    ];
    rows.extend(
        report
            .filled_sales
            .iter()
            .map(|(column, count)| (format!("{column} filled"), *count)),
    );
    rows.extend(
        report
            .unknown_text
            .iter()
            .map(|(column, count)| (format!("{column} set to Unknown"), *count)),
    );

    let mut table = Table::new();
    table.set_header(vec![header_cell("Cleaning"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, Color::Yellow)]);
    }
    for (canonical, raw) in &report.renamed_columns {
        table.add_row(vec![
            Cell::new(format!("{raw} renamed to {canonical}")),
            dim_cell("-"),
        ]);
    }
    println!("{table}");
}

fn print_artifact_table(result: &BuildResult) {
    if result.artifacts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Rows"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for artifact in &result.artifacts {
        let rows = match artifact.rows {
            Some(rows) => Cell::new(rows),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&artifact.name),
            rows,
            dim_cell(short_hash(&artifact.sha256)),
        ]);
    }
    println!("{table}");
}

pub fn print_exploration(result: &ExploreResult) {
    println!("Data: {}", result.data_dir.display());
    for profile in &result.profiles {
        println!(
            "{}: {} rows, {} columns, {} missing cells",
            profile.name,
            profile.rows,
            profile.columns.len(),
            profile.total_missing()
        );
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Column"),
            header_cell("Missing"),
            header_cell("Distinct"),
            header_cell("Numeric"),
            header_cell("Sample"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Center);
        for column in &profile.columns {
            table.add_row(vec![
                Cell::new(&column.name),
                count_cell(column.missing, Color::Yellow),
                Cell::new(column.distinct),
                if column.is_numeric {
                    Cell::new("yes").fg(Color::Green)
                } else {
                    dim_cell("no")
                },
                dim_cell(column.sample_values.join(", ")),
            ]);
        }
        println!("{table}");
    }
    if let Some(top) = &result.top_games {
        println!("Best-selling chart rows:");
        print_frame(top);
    }
    if !result.failures.is_empty() {
        eprintln!("Tables not loaded:");
        for (dataset, reason) in &result.failures {
            eprintln!("- {dataset}: {reason}");
        }
    }
}

pub fn print_view(result: &ViewResult) {
    println!("Output: {}", result.output_dir.display());
    println!("View: {}", result.view);
    if !result.filter.is_empty() {
        let mut parts = Vec::new();
        if let Some(platform) = &result.filter.platform {
            parts.push(format!("platform={platform}"));
        }
        if let Some(genre) = &result.filter.genre {
            parts.push(format!("genre={genre}"));
        }
        if let Some((from, to)) = result.filter.year_range {
            parts.push(format!("years={from}-{to}"));
        }
        println!("Filter: {}", parts.join(" "));
    }
    println!("Platforms: {}", result.platforms.join(", "));
    println!("Genres: {}", result.genres.join(", "));

    let metrics = &result.metrics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("games"), Cell::new(metrics.games)]);
    table.add_row(vec![
        Cell::new("total sales"),
        Cell::new(format!("{:.2}", metrics.total_sales)),
    ]);
    table.add_row(vec![
        Cell::new("average sales"),
        match metrics.average_sales {
            Some(average) => Cell::new(format!("{average:.2}")),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![Cell::new("platforms"), Cell::new(metrics.platforms)]);
    for (column, sum) in &metrics.regional_sales {
        table.add_row(vec![
            Cell::new(format!("  -> {column}")).fg(Color::DarkGrey),
            Cell::new(format!("{sum:.2}")),
        ]);
    }
    println!("{table}");

    if result.top_games.height() > 0 {
        println!("Top games:");
        print_frame(&result.top_games);
    }
}

pub fn print_lookups(lookups: &LookupTables) {
    println!("Lookups: {} ({})", lookups.origin, short_hash(&lookups.sha256));
    let mut table = Table::new();
    table.set_header(vec![header_cell("Platform"), header_cell("Generation")]);
    apply_table_style(&mut table);
    for (platform, label) in &lookups.platform_generations {
        table.add_row(vec![Cell::new(platform), Cell::new(label)]);
    }
    println!("{table}");

    let segments = &lookups.segments;
    println!("Recent year threshold: {}", segments.recent_year_threshold);
    println!(
        "Major publishers: {}",
        segments
            .major_publishers
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Top platforms: {}",
        segments
            .top_platforms
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Release years: {}-{}",
        lookups.cleaning.min_year, lookups.cleaning.max_year
    );
}

fn print_frame(df: &DataFrame) {
    let mut table = Table::new();
    let names: Vec<Cell> = df
        .get_column_names()
        .into_iter()
        .map(|name| header_cell(name.as_str()))
        .collect();
    table.set_header(names);
    apply_table_style(&mut table);
    for idx in 0..df.height() {
        let mut row = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let cell = match column.get(idx) {
                Ok(value) => Cell::new(any_to_string(value)),
                Err(_) => dim_cell("-"),
            };
            row.push(cell);
        }
        table.add_row(row);
    }
    println!("{table}");
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
