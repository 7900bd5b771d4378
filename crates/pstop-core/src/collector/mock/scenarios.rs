//! Pre-built counter scenarios for demos and tests.
//!
//! The data directory of these scenarios is `/var/lib/mysql/` and the relay
//! log base is `relay-bin`.

use super::MockSource;
use crate::models::{CounterRow, FILE_IO_LATENCY, TABLE_IO_LATENCY, TABLE_LOCK_LATENCY};

const MS: u64 = 1_000_000_000;

pub const SCENARIO_DATADIR: &str = "/var/lib/mysql/";
pub const SCENARIO_RELAY_LOG: &str = "relay-bin";

/// `file_summary_by_instance` row from per-operation counts, wait times (ms)
/// and byte totals.
fn file(name: &str, ops: [u64; 3], wait_ms: [u64; 3], bytes: [u64; 2]) -> CounterRow {
    let [reads, writes, misc] = ops;
    let [rd, wr, mi] = wait_ms.map(|ms| ms * MS);
    CounterRow::new(
        name,
        vec![
            reads + writes + misc,
            reads,
            writes,
            misc,
            rd + wr + mi,
            rd,
            wr,
            mi,
            bytes[0],
            bytes[1],
        ],
    )
}

/// `table_lock_waits_summary_by_table` row; read waits are booked as normal
/// reads and write waits as normal writes.
fn lock(name: &str, count: u64, read_ms: u64, write_ms: u64) -> CounterRow {
    let (rd, wr) = (read_ms * MS, write_ms * MS);
    let mut row = TABLE_LOCK_LATENCY.zero_row(name);
    row.values[0] = count;
    row.values[1] = rd + wr;
    row.values[2] = rd;
    row.values[3] = wr;
    row.values[7] = rd;
    row.values[12] = wr;
    row
}

/// `table_io_waits_summary_by_table` row from fetch/insert/update/delete
/// counts and wait times (ms).
fn table_io(name: &str, ops: [u64; 4], wait_ms: [u64; 4]) -> CounterRow {
    let waits = wait_ms.map(|ms| ms * MS);
    let mut values: Vec<u64> = Vec::with_capacity(10);
    values.push(ops.iter().sum());
    values.extend(ops);
    values.push(waits.iter().sum());
    values.extend(waits);
    CounterRow::new(name, values)
}

impl MockSource {
    /// A busy server whose counters grow on every poll.
    ///
    /// Files include partitioned tables, temporary tables, redo and relay
    /// logs, and idle files that are filtered out.
    pub fn typical_server() -> Self {
        Self::server(None)
    }

    /// Like [`typical_server`](Self::typical_server), but the counters start
    /// over every `restart_every` polls, as after a server restart.
    pub fn restarting_server(restart_every: usize) -> Self {
        Self::server(Some(restart_every))
    }

    fn server(restart_every: Option<usize>) -> Self {
        let files_base = vec![
            file("/var/lib/mysql/shop/orders#P#p0.ibd", [900, 300, 20], [450, 300, 10], [14_745_600, 4_915_200]),
            file("/var/lib/mysql/shop/orders#P#p1.ibd", [1200, 410, 25], [610, 420, 12], [19_660_800, 6_717_440]),
            file("/var/lib/mysql/shop/orders#P#pMAX.ibd", [15, 2, 1], [8, 2, 1], [245_760, 32_768]),
            file("/var/lib/mysql/shop/customers.ibd", [4000, 120, 30], [880, 95, 9], [65_536_000, 1_966_080]),
            file("/var/lib/mysql/shop/price@0024list.ibd", [60, 0, 4], [30, 0, 2], [983_040, 0]),
            file("/var/lib/mysql/my@002dapp/sessions.ibd", [300, 290, 10], [40, 160, 3], [4_915_200, 4_751_360]),
            file("/tmp/shop/#sql-1f3a_2c.ibd", [50, 80, 6], [9, 31, 1], [819_200, 1_310_720]),
            file("/tmp/shop/#sql-1f3a_2d.ibd", [10, 40, 6], [2, 12, 1], [163_840, 655_360]),
            file("/var/lib/mysql/ibdata1", [700, 350, 90], [260, 190, 30], [11_468_800, 5_734_400]),
            file("/var/lib/mysql/ibtmp1", [20, 60, 4], [3, 14, 1], [327_680, 983_040]),
            file("/var/lib/mysql/ib_logfile0", [0, 5200, 5200], [0, 1_900, 2_600], [0, 41_943_040]),
            file("/var/lib/mysql/ib_logfile1", [0, 4100, 4100], [0, 1_500, 2_100], [0, 33_554_432]),
            file("/var/lib/mysql/binlog.000017", [0, 2600, 150], [0, 720, 90], [0, 20_971_520]),
            file("/var/lib/mysql/binlog.index", [3, 1, 2], [0, 0, 0], [512, 64]),
            file("/var/lib/mysql/relay-bin.000042", [1800, 1800, 40], [210, 390, 7], [14_680_064, 14_680_064]),
            file("/var/lib/mysql/relay-bin.index", [2, 1, 2], [0, 0, 0], [256, 64]),
            file("/var/lib/mysql/shop/db.opt", [2, 0, 1], [0, 0, 0], [128, 0]),
            file("/var/lib/mysql/auto.cnf", [1, 0, 1], [0, 0, 0], [56, 0]),
            file("/var/lib/mysql/db-host-1.pid", [0, 1, 1], [0, 0, 0], [0, 6]),
            file("/usr/share/mysql/english/errmsg.sys", [3, 0, 2], [0, 0, 0], [250_000, 0]),
            file("/usr/share/mysql/charsets/Index.xml", [1, 0, 1], [0, 0, 0], [18_000, 0]),
            file("/var/lib/mysql/slowlog", [0, 35, 2], [0, 4, 0], [0, 71_680]),
            file("/var/lib/mysql/undo_001", [120, 240, 12], [20, 60, 2], [1_966_080, 3_932_160]),
            file("/var/lib/mysql/shop/archive_2019.ibd", [0, 0, 0], [0, 0, 0], [0, 0]),
        ];
        let files_step = vec![
            file("/var/lib/mysql/shop/orders#P#p0.ibd", [30, 12, 1], [15, 12, 0], [491_520, 196_608]),
            file("/var/lib/mysql/shop/orders#P#p1.ibd", [45, 20, 1], [22, 18, 1], [737_280, 327_680]),
            file("/var/lib/mysql/shop/customers.ibd", [90, 3, 1], [20, 3, 0], [1_474_560, 49_152]),
            file("/var/lib/mysql/my@002dapp/sessions.ibd", [15, 15, 0], [2, 9, 0], [245_760, 245_760]),
            file("/tmp/shop/#sql-1f3a_2c.ibd", [4, 7, 1], [1, 3, 0], [65_536, 114_688]),
            file("/var/lib/mysql/ibdata1", [12, 6, 1], [4, 3, 0], [196_608, 98_304]),
            file("/var/lib/mysql/ib_logfile0", [0, 160, 160], [0, 60, 80], [0, 1_310_720]),
            file("/var/lib/mysql/binlog.000017", [0, 80, 4], [0, 22, 2], [0, 655_360]),
            file("/var/lib/mysql/relay-bin.000042", [60, 60, 1], [7, 13, 0], [491_520, 491_520]),
        ];

        let locks_base = vec![
            lock("shop.orders", 5_400, 2_100, 3_300),
            lock("shop.customers", 4_150, 1_900, 210),
            lock("shop.price$list", 64, 30, 0),
            lock("my-app.sessions", 600, 120, 480),
            lock("shop.#sql-1f3a_2c", 136, 20, 60),
            lock("shop.#sql-1f3a_2d", 56, 4, 20),
            lock("shop.archive_2019", 0, 0, 0),
        ];
        let locks_step = vec![
            lock("shop.orders", 120, 45, 70),
            lock("shop.customers", 94, 40, 5),
            lock("my-app.sessions", 30, 5, 22),
            lock("shop.#sql-1f3a_2c", 12, 2, 5),
        ];

        let io_base = vec![
            table_io("shop.orders", [48_000, 2_100, 900, 40], [1_800, 610, 420, 25]),
            table_io("shop.customers", [91_000, 120, 300, 0], [2_400, 40, 95, 0]),
            table_io("shop.price$list", [6_400, 0, 0, 0], [130, 0, 0, 0]),
            table_io("my-app.sessions", [3_000, 1_500, 1_450, 1_400], [60, 140, 150, 130]),
            table_io("shop.#sql-1f3a_2c", [800, 800, 0, 0], [20, 35, 0, 0]),
            table_io("shop.archive_2019", [0, 0, 0, 0], [0, 0, 0, 0]),
        ];
        let io_step = vec![
            table_io("shop.orders", [1_600, 70, 30, 1], [60, 20, 14, 1]),
            table_io("shop.customers", [3_100, 4, 10, 0], [80, 1, 3, 0]),
            table_io("my-app.sessions", [100, 50, 48, 47], [2, 5, 5, 4]),
        ];

        Self::new()
            .with_growth(&FILE_IO_LATENCY, files_base, files_step, restart_every)
            .with_growth(&TABLE_LOCK_LATENCY, locks_base, locks_step, restart_every)
            .with_growth(&TABLE_IO_LATENCY, io_base, io_step, restart_every)
    }
}
