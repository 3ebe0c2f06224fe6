// Criterion benchmarks for Jobmatch

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use jobmatch::core::{infer_from_title, score_posting, RankingPipeline};
use jobmatch::models::{
    CompensationRange, EmployerSize, JobPosting, PointBudgets, PreferenceProfile, RankingOptions,
    SeniorityBand,
};

const SKILLS: &[&str] = &[
    "Rust", "Go", "TypeScript", "React", "PostgreSQL", "Kubernetes", "AWS", "Python", "Kafka",
    "GraphQL",
];
const TITLES: &[&str] = &[
    "Senior Backend Engineer", "Staff Platform Engineer", "Frontend Developer",
    "Junior Data Analyst", "Mid-level SRE", "Principal Architect",
];
const CITIES: &[&str] = &["San Francisco, CA", "Austin, TX", "New York, NY", "Remote"];

fn create_posting(id: usize) -> JobPosting {
    let skills = (0..4).map(|k| SKILLS[(id + k * 3) % SKILLS.len()].to_string()).collect();
    let base = 90_000.0 + (id % 10) as f64 * 10_000.0;

    JobPosting {
        id: format!("job-{}", id),
        title: TITLES[id % TITLES.len()].to_string(),
        location: CITIES[id % CITIES.len()].to_string(),
        compensation: Some(CompensationRange::new(base, base + 30_000.0)),
        skills,
        employment_type: None,
        employer_id: format!("employer-{}", id % 50),
        employer_size: Some(if id % 2 == 0 { EmployerSize::Startup } else { EmployerSize::Large }),
        remote: id % 4 == 3,
        seniority: None,
        posted_at: None,
    }
}

fn create_profile() -> PreferenceProfile {
    PreferenceProfile {
        subject_id: "bench_user".to_string(),
        skills: vec!["rust".to_string(), "kubernetes".to_string(), "postgres".to_string()],
        preferred_location: Some("San Francisco".to_string()),
        compensation: Some(CompensationRange::new(140_000.0, 170_000.0)),
        seniority: Some(SeniorityBand::Senior),
        employer_size: Some(EmployerSize::Startup),
        remote: Some(true),
    }
}

fn bench_score_posting(c: &mut Criterion) {
    let posting = create_posting(7);
    let profile = create_profile();
    let budgets = PointBudgets::default();

    c.bench_function("score_posting", |b| {
        b.iter(|| score_posting(black_box(&posting), black_box(&profile), black_box(&budgets)))
    });
}

fn bench_title_inference(c: &mut Criterion) {
    c.bench_function("infer_from_title", |b| {
        b.iter(|| infer_from_title(black_box("Senior Staff Software Engineer, Payments")))
    });
}

fn bench_ranking(c: &mut Criterion) {
    let profile = create_profile();
    let options = RankingOptions::default();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000, 10_000].iter() {
        let candidates: Vec<JobPosting> = (0..*candidate_count).map(create_posting).collect();

        for workers in [1, 4] {
            let pipeline = RankingPipeline::new(PointBudgets::default(), workers);
            group.bench_with_input(
                BenchmarkId::new(format!("recommend_{}_workers", workers), candidate_count),
                candidate_count,
                |b, _| {
                    b.iter(|| {
                        pipeline.recommend(
                            black_box(&profile),
                            black_box(&candidates),
                            black_box(&options),
                            None,
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_score_posting,
    bench_title_inference,
    bench_ranking
);

criterion_main!(benches);
