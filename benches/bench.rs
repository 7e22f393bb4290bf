// Criterion benchmarks for StudyMate

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use studymate::core::{apply_filter, top_by_rating};
use studymate::{NewProfile, Profile, ProfileFilter, SortOrder};
use uuid::Uuid;

const SUBJECTS: [&str; 5] = ["Mathematics", "Physics", "History", "Applied Math", "Chemistry"];

fn create_profile(id: usize) -> Profile {
    NewProfile {
        email: format!("student{}@x.com", id),
        subject: SUBJECTS[id % SUBJECTS.len()].to_string(),
        rating: (id % 50) as f64 / 10.0,
        xp_level: (id % 97) as f64,
        ..Default::default()
    }
    .into_profile(Uuid::new_v4(), Utc::now() + Duration::milliseconds(id as i64))
}

fn bench_top_profiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_by_rating");

    for size in [100, 1_000, 10_000] {
        let profiles: Vec<Profile> = (0..size).map(create_profile).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &profiles, |b, profiles| {
            b.iter(|| top_by_rating(black_box(profiles), black_box(3)));
        });
    }

    group.finish();
}

fn bench_subject_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_filter");
    let filter = ProfileFilter::default()
        .subject("math")
        .sort_by_xp(SortOrder::Desc);

    for size in [100, 1_000, 10_000] {
        let profiles: Vec<Profile> = (0..size).map(create_profile).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &profiles, |b, profiles| {
            b.iter(|| apply_filter(black_box(profiles), black_box(&filter)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_top_profiles, bench_subject_filter);
criterion_main!(benches);
