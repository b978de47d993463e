use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgsearch::{Placeholders, SearchParams, SearchQuery, SortSpec, qb};

/// Build a search over `n` equality filters plus one `n`-element IN list:
/// SELECT * FROM t WHERE col0 = $1 AND ... AND tag IN (...) ORDER BY ...
fn build_search(n: usize) -> SearchQuery {
    let sort = SortSpec::new().default_desc("t.created_at").column("name", "t.name");
    let tags: Vec<i64> = (0..n as i64).collect();

    let mut qb = qb::search().from("t");
    for i in 0..n {
        qb = qb.where_eq(&format!("t.col{i}"), &format!("col{i}"), i as i64);
    }
    qb.where_eq("t.tag", "tag", tags)
        .order_by_always(&sort, "-default", Some("name"))
        .finish()
        .expect("valid search")
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("search/render");

    for n in [1, 5, 10, 50, 100] {
        let query = build_search(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| {
                black_box(query.to_count_sql(Placeholders::Numbered));
                black_box(query.to_page_sql(Placeholders::Numbered));
            });
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("search/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let query = build_search(n);
                black_box(query.to_page_sql(Placeholders::Numbered));
            });
        });
    }

    group.finish();
}

fn bench_from_params(c: &mut Criterion) {
    let mut group = c.benchmark_group("search/from_params");

    let params = SearchParams::from_query(
        "stage=KYC&stage=SANCTION&loanType=GOLD&firstName=ra&fromDate=2024-01-01&toDate=2024-12-31&sortBy=-amount",
    );
    let sort = SortSpec::new()
        .default_desc("l.created_at")
        .column("amount", "l.loan_amount");

    group.bench_function("loan_filters", |b| {
        b.iter(|| {
            let query = qb::search_with(&params)
                .from("loan_accounts l")
                .where_param_list("l.current_stage", "stage")
                .where_param("l.loan_type", "loanType")
                .where_like_param("l.first_name", "firstName", pgsearch::LikePattern::End)
                .where_between_param("l.sanction_date", "fromDate", "toDate")
                .and_then(|qb| qb.order_by_always_param(&sort, "-default", "sortBy").finish())
                .expect("valid search");
            black_box(query.to_page_sql(Placeholders::Numbered));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_build_and_render, bench_from_params);
criterion_main!(benches);
