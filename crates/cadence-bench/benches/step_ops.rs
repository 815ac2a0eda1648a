//! Criterion benchmarks for executing scheduler steps.

use std::hint::black_box;

use cadence_bench::{layered_config, phase_name, LayeredProfile};
use cadence_engine::{Registrations, Scheduler, SchedulerConfig};
use cadence_graph::action_fn;
use cadence_test_utils::pic;
use criterion::{criterion_group, criterion_main, Criterion};

fn pic_scheduler() -> Scheduler {
    let config = SchedulerConfig {
        schedule: pic::schedule(),
        ..SchedulerConfig::default()
    };
    let mut sched = Scheduler::new(config).unwrap();
    sched
        .apply(Registrations::new().with("pic", |reg| {
            pic::register_with(reg, || action_fn(|_| 0))
        }))
        .unwrap();
    sched.init().unwrap();
    sched.setup().unwrap();
    sched
}

fn layered_scheduler(phases: usize, profile: &LayeredProfile) -> Scheduler {
    let mut sched = Scheduler::new(layered_config(phases, 0)).unwrap();
    let mut regs = Registrations::new();
    for i in 0..phases {
        let profile = profile.clone();
        regs.push(phase_name(i), move |reg| profile.register(reg, &phase_name(i)));
    }
    sched.apply(regs).unwrap();
    sched.init().unwrap();
    sched
}

fn bench_pic_step(c: &mut Criterion) {
    let mut sched = pic_scheduler();
    c.bench_function("step_pic", |b| {
        b.iter(|| black_box(sched.step().unwrap()));
    });
}

fn bench_layered_step(c: &mut Criterion) {
    let profile = LayeredProfile::new(10, 50, 42);
    let mut sched = layered_scheduler(4, &profile);
    c.bench_function("step_layered_4x500", |b| {
        b.iter(|| black_box(sched.step().unwrap().total_us));
    });
}

criterion_group!(benches, bench_pic_step, bench_layered_step);
criterion_main!(benches);
