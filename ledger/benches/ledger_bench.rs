use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tally_ledger::{History, Ledger, LedgerConfig};
use tally_types::{Address, DENOMINATOR};

const ADMIN: Address = Address::new([0xAA; 20]);
const POLICY: Address = Address::new([0xAB; 20]);

fn account(n: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[16..].copy_from_slice(&(n + 1).to_be_bytes());
    Address::new(bytes)
}

fn ledger() -> Ledger {
    let mut config = LedgerConfig::with_admin(ADMIN);
    config.minters.push(POLICY);
    config.rebasers.push(POLICY);
    config.snapshotters.push(POLICY);
    Ledger::new(&config).unwrap()
}

fn history_with_checkpoints(n: u64) -> History {
    let mut history = History::new();
    for block in 0..n {
        history.push(block * 2, u128::from(block)).unwrap();
    }
    history
}

fn bench_history_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_lookup");

    for count in [10u64, 1_000, 100_000] {
        let history = history_with_checkpoints(count);
        group.bench_with_input(BenchmarkId::new("value_at", count), &count, |b, &count| {
            b.iter(|| black_box(history.value_at(black_box(count))));
        });
    }

    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for delegated in [false, true] {
        let mut l = ledger();
        for n in 0..3 {
            l.enable_voting(account(n)).unwrap();
        }
        l.enable_delegation_to(account(2)).unwrap();
        l.mint(POLICY, account(0), 1_000_000).unwrap();
        l.mint(POLICY, account(1), 1_000_000).unwrap();
        if delegated {
            l.delegate(account(0), account(2)).unwrap();
        }

        group.bench_function(BenchmarkId::new("voter_to_voter", delegated), |b| {
            b.iter(|| {
                l.transfer(account(0), account(1), black_box(1)).unwrap();
                l.transfer(account(1), account(0), black_box(1)).unwrap();
                l.drain_events();
            });
        });
    }

    group.finish();
}

fn bench_snapshot_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_reads");

    for blocks in [10u32, 1_000] {
        let mut l = ledger();
        l.enable_voting(account(0)).unwrap();
        for _ in 0..blocks {
            l.mint(POLICY, account(0), 1).unwrap();
            l.rebase(POLICY, DENOMINATOR).unwrap();
            l.advance_block();
        }
        l.snapshot(POLICY).unwrap();

        group.bench_with_input(BenchmarkId::new("vote_balance_snapshot", blocks), &blocks, |b, _| {
            b.iter(|| black_box(l.vote_balance_snapshot(black_box(&account(0))).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_history_lookup, bench_transfer, bench_snapshot_reads);
criterion_main!(benches);
