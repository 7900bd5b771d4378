//! Built-in resource kinds, one per performance_schema summary table.

use super::{Column, ColumnValue, FieldSpec, NameRules, ResourceKind};

use ColumnValue::{Amount, PctOfRow, PctOfTotal, Time};

// ---------------------------------------------------------------------------
// file_summary_by_instance
// ---------------------------------------------------------------------------

mod file_io {
    pub const COUNT_STAR: usize = 0;
    pub const COUNT_READ: usize = 1;
    pub const COUNT_WRITE: usize = 2;
    pub const COUNT_MISC: usize = 3;
    pub const SUM_TIMER_WAIT: usize = 4;
    pub const SUM_TIMER_READ: usize = 5;
    pub const SUM_TIMER_WRITE: usize = 6;
    pub const SUM_TIMER_MISC: usize = 7;
    pub const BYTES_READ: usize = 8;
    pub const BYTES_WRITE: usize = 9;
}

pub static FILE_IO_LATENCY: ResourceKind = ResourceKind {
    name: "file_io_latency",
    description: "File I/O Latency (file_summary_by_instance)",
    fields: &[
        FieldSpec::count("count_star"),
        FieldSpec::count("count_read"),
        FieldSpec::count("count_write"),
        FieldSpec::count("count_misc"),
        FieldSpec::time("sum_timer_wait"),
        FieldSpec::time("sum_timer_read"),
        FieldSpec::time("sum_timer_write"),
        FieldSpec::time("sum_timer_misc"),
        FieldSpec::bytes("sum_number_of_bytes_read"),
        FieldSpec::bytes("sum_number_of_bytes_write"),
    ],
    count_field: file_io::COUNT_STAR,
    time_field: file_io::SUM_TIMER_WAIT,
    columns: &[
        &[
            Column::new("Latency", 10, Time(file_io::SUM_TIMER_WAIT)),
            Column::new("%", 6, PctOfTotal(file_io::SUM_TIMER_WAIT)),
        ],
        &[
            Column::new("Read", 6, PctOfRow(file_io::SUM_TIMER_READ, file_io::SUM_TIMER_WAIT)),
            Column::new("Write", 6, PctOfRow(file_io::SUM_TIMER_WRITE, file_io::SUM_TIMER_WAIT)),
            Column::new("Misc", 6, PctOfRow(file_io::SUM_TIMER_MISC, file_io::SUM_TIMER_WAIT)),
        ],
        &[
            Column::new("Rd bytes", 8, Amount(file_io::BYTES_READ)),
            Column::new("Wr bytes", 8, Amount(file_io::BYTES_WRITE)),
        ],
        &[
            Column::new("Ops", 8, Amount(file_io::COUNT_STAR)),
            Column::new("R Ops", 6, PctOfRow(file_io::COUNT_READ, file_io::COUNT_STAR)),
            Column::new("W Ops", 6, PctOfRow(file_io::COUNT_WRITE, file_io::COUNT_STAR)),
            Column::new("M Ops", 6, PctOfRow(file_io::COUNT_MISC, file_io::COUNT_STAR)),
        ],
    ],
    name_label: "File Name",
    name_rules: NameRules::File,
};

// ---------------------------------------------------------------------------
// table_lock_waits_summary_by_table
// ---------------------------------------------------------------------------

mod table_lock {
    pub const COUNT_STAR: usize = 0;
    pub const SUM_TIMER_WAIT: usize = 1;
    pub const SUM_TIMER_READ: usize = 2;
    pub const SUM_TIMER_WRITE: usize = 3;
    pub const READ_WITH_SHARED_LOCKS: usize = 4;
    pub const READ_HIGH_PRIORITY: usize = 5;
    pub const READ_NO_INSERT: usize = 6;
    pub const READ_NORMAL: usize = 7;
    pub const READ_EXTERNAL: usize = 8;
    pub const WRITE_ALLOW_WRITE: usize = 9;
    pub const WRITE_CONCURRENT_INSERT: usize = 10;
    pub const WRITE_LOW_PRIORITY: usize = 11;
    pub const WRITE_NORMAL: usize = 12;
    pub const WRITE_EXTERNAL: usize = 13;
}

const fn lock_share(label: &'static str, field: usize) -> Column {
    Column::new(label, 6, PctOfRow(field, table_lock::SUM_TIMER_WAIT))
}

pub static TABLE_LOCK_LATENCY: ResourceKind = ResourceKind {
    name: "table_lock_latency",
    description: "Locks by Table Name (table_lock_waits_summary_by_table)",
    fields: &[
        FieldSpec::count("count_star"),
        FieldSpec::time("sum_timer_wait"),
        FieldSpec::time("sum_timer_read"),
        FieldSpec::time("sum_timer_write"),
        FieldSpec::time("sum_timer_read_with_shared_locks"),
        FieldSpec::time("sum_timer_read_high_priority"),
        FieldSpec::time("sum_timer_read_no_insert"),
        FieldSpec::time("sum_timer_read_normal"),
        FieldSpec::time("sum_timer_read_external"),
        FieldSpec::time("sum_timer_write_allow_write"),
        FieldSpec::time("sum_timer_write_concurrent_insert"),
        FieldSpec::time("sum_timer_write_low_priority"),
        FieldSpec::time("sum_timer_write_normal"),
        FieldSpec::time("sum_timer_write_external"),
    ],
    count_field: table_lock::COUNT_STAR,
    time_field: table_lock::SUM_TIMER_WAIT,
    columns: &[
        &[
            Column::new("Latency", 10, Time(table_lock::SUM_TIMER_WAIT)),
            Column::new("%", 6, PctOfTotal(table_lock::SUM_TIMER_WAIT)),
        ],
        &[
            lock_share("Read", table_lock::SUM_TIMER_READ),
            lock_share("Write", table_lock::SUM_TIMER_WRITE),
        ],
        &[
            lock_share("S.Lock", table_lock::READ_WITH_SHARED_LOCKS),
            lock_share("High", table_lock::READ_HIGH_PRIORITY),
            lock_share("NoIns", table_lock::READ_NO_INSERT),
            lock_share("Normal", table_lock::READ_NORMAL),
            lock_share("Extrnl", table_lock::READ_EXTERNAL),
        ],
        &[
            lock_share("AlloWr", table_lock::WRITE_ALLOW_WRITE),
            lock_share("CncIns", table_lock::WRITE_CONCURRENT_INSERT),
            lock_share("Low", table_lock::WRITE_LOW_PRIORITY),
            lock_share("Normal", table_lock::WRITE_NORMAL),
            lock_share("Extrnl", table_lock::WRITE_EXTERNAL),
        ],
    ],
    name_label: "Table Name",
    name_rules: NameRules::Table,
};

// ---------------------------------------------------------------------------
// table_io_waits_summary_by_table
// ---------------------------------------------------------------------------

mod table_io {
    pub const COUNT_STAR: usize = 0;
    pub const COUNT_FETCH: usize = 1;
    pub const COUNT_INSERT: usize = 2;
    pub const COUNT_UPDATE: usize = 3;
    pub const COUNT_DELETE: usize = 4;
    pub const SUM_TIMER_WAIT: usize = 5;
    pub const SUM_TIMER_FETCH: usize = 6;
    pub const SUM_TIMER_INSERT: usize = 7;
    pub const SUM_TIMER_UPDATE: usize = 8;
    pub const SUM_TIMER_DELETE: usize = 9;
}

pub static TABLE_IO_LATENCY: ResourceKind = ResourceKind {
    name: "table_io_latency",
    description: "Table Latency (table_io_waits_summary_by_table)",
    fields: &[
        FieldSpec::count("count_star"),
        FieldSpec::count("count_fetch"),
        FieldSpec::count("count_insert"),
        FieldSpec::count("count_update"),
        FieldSpec::count("count_delete"),
        FieldSpec::time("sum_timer_wait"),
        FieldSpec::time("sum_timer_fetch"),
        FieldSpec::time("sum_timer_insert"),
        FieldSpec::time("sum_timer_update"),
        FieldSpec::time("sum_timer_delete"),
    ],
    count_field: table_io::COUNT_STAR,
    time_field: table_io::SUM_TIMER_WAIT,
    columns: &[
        &[
            Column::new("Latency", 10, Time(table_io::SUM_TIMER_WAIT)),
            Column::new("%", 6, PctOfTotal(table_io::SUM_TIMER_WAIT)),
        ],
        &[
            Column::new("Fetch", 6, PctOfRow(table_io::SUM_TIMER_FETCH, table_io::SUM_TIMER_WAIT)),
            Column::new("Insert", 6, PctOfRow(table_io::SUM_TIMER_INSERT, table_io::SUM_TIMER_WAIT)),
            Column::new("Update", 6, PctOfRow(table_io::SUM_TIMER_UPDATE, table_io::SUM_TIMER_WAIT)),
            Column::new("Delete", 6, PctOfRow(table_io::SUM_TIMER_DELETE, table_io::SUM_TIMER_WAIT)),
        ],
        &[
            Column::new("Ops", 8, Amount(table_io::COUNT_STAR)),
            Column::new("F Ops", 6, PctOfRow(table_io::COUNT_FETCH, table_io::COUNT_STAR)),
            Column::new("I Ops", 6, PctOfRow(table_io::COUNT_INSERT, table_io::COUNT_STAR)),
            Column::new("U Ops", 6, PctOfRow(table_io::COUNT_UPDATE, table_io::COUNT_STAR)),
            Column::new("D Ops", 6, PctOfRow(table_io::COUNT_DELETE, table_io::COUNT_STAR)),
        ],
    ],
    name_label: "Table Name",
    name_rules: NameRules::Table,
};

/// Every built-in kind, in display order.
pub static ALL_KINDS: &[&ResourceKind] = &[&FILE_IO_LATENCY, &TABLE_LOCK_LATENCY, &TABLE_IO_LATENCY];
