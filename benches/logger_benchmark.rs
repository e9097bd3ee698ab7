use chainlog::log::{
    EntryId, LogEntry, LogSink, Logger, LoggingConfig, ProviderDescriptor, ProviderRegistry,
    Severity,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

/// 丢弃所有日志，避免 benchmark 过程中内存增长
struct NullSink;

impl LogSink for NullSink {
    fn log_internal(&self, entry: &LogEntry) -> anyhow::Result<Option<EntryId>> {
        black_box(entry);
        Ok(None)
    }
}

struct FailingSink;

impl LogSink for FailingSink {
    fn log_internal(&self, _: &LogEntry) -> anyhow::Result<Option<EntryId>> {
        Err(anyhow::anyhow!("sink unavailable"))
    }
}

/// 创建 benchmark 用的 registry
fn create_benchmark_registry(main_failing: bool) -> Arc<ProviderRegistry> {
    let config = LoggingConfig::new(
        "Main",
        vec![
            ProviderDescriptor::new("Main", "MemorySink")
                .with_threshold(Severity::Information)
                .with_fallback("Backup"),
            ProviderDescriptor::new("Backup", "MemorySink"),
            ProviderDescriptor::new("System", "MemorySink"),
            ProviderDescriptor::new("System.Configuration", "MemorySink"),
            ProviderDescriptor::new("System.Configuration.Install", "MemorySink"),
        ],
    );

    let factory = move |d: &ProviderDescriptor| -> anyhow::Result<Arc<dyn LogSink>> {
        if main_failing && d.name == "Main" {
            Ok(Arc::new(FailingSink))
        } else {
            Ok(Arc::new(NullSink))
        }
    };

    Arc::new(ProviderRegistry::with_factory(&config, &factory).unwrap())
}

fn benchmark_basic_logging(c: &mut Criterion) {
    let logger: Logger = create_benchmark_registry(false).default_logger();

    let mut group = c.benchmark_group("logger_basic");

    group.bench_function("accepted", |b| {
        b.iter(|| black_box(logger.log(Severity::Warning, black_box("Simple log message"))))
    });

    group.bench_function("below_threshold", |b| {
        b.iter(|| black_box(logger.log(Severity::Debug, black_box("Simple log message"))))
    });

    group.bench_function("with_source", |b| {
        b.iter(|| {
            black_box(logger.log_with_source(
                Severity::Error,
                black_box("Simple log message"),
                black_box("OrderService.Submit(Order)"),
            ))
        })
    });

    group.finish();
}

fn benchmark_fallback(c: &mut Criterion) {
    // 每次写入都会转到 fallback
    let logger = create_benchmark_registry(true).default_logger();

    c.bench_function("fallback_double_write", |b| {
        b.iter(|| black_box(logger.log(Severity::Error, black_box("Failing log message"))))
    });
}

fn benchmark_different_message_sizes(c: &mut Criterion) {
    let logger = create_benchmark_registry(false).default_logger();

    let mut group = c.benchmark_group("message_sizes");

    for size in [10, 100, 1000].iter() {
        let message = "x".repeat(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, msg| {
            b.iter(|| black_box(logger.log(Severity::Warning, black_box(msg))))
        });
    }

    group.finish();
}

fn benchmark_resolve(c: &mut Criterion) {
    let registry = create_benchmark_registry(false);

    let mut group = c.benchmark_group("resolve");

    for name in [
        "System.Configuration.Install",
        "System.Configuration.Install.FooBar",
        "CuttingEdge.Logging",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |b, name| {
            b.iter(|| black_box(registry.resolve(black_box(name))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_basic_logging,
    benchmark_fallback,
    benchmark_different_message_sizes,
    benchmark_resolve
);
criterion_main!(benches);
