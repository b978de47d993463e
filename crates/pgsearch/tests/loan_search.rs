//! Rendering of a real-world loan search: many joins, optional filters, grouped rows.

use pgsearch::{LikePattern, Placeholders, SearchParams, SearchQuery, SearchResult, SortSpec, qb};

fn loan_sort() -> SortSpec {
    SortSpec::from_pairs([
        ("-default", "l.created_at"),
        ("stage", "l.current_stage"),
        ("loanApplicationDate", "l.loan_application_date"),
        ("loanAmount", "l.loan_amount"),
        ("status", "l.status"),
        ("productCode", "l.product_code"),
        ("lastStageChangedAt", "l.last_stage_changed_at"),
    ])
}

fn loan_search(params: &SearchParams) -> SearchResult<SearchQuery> {
    let mut qb = qb::search_with(params)
        .count_expr("wf.id")
        .select(&[
            "wf.id",
            "wf.current_stage",
            "l.id AS loan_id",
            " l.status",
            "l.loan_amount",
            "c.first_name",
        ])
        .from("loan_accounts l")
        .inner_join("wf_data AS wf", "l.id = wf.reference_key")
        .left_join("customer AS c", "l.customer_id = c.id")
        .left_join("loan_account_addl lad", "lad.loan_id = l.id")
        .inner_join("branchset_access bsa", "l.branch_id = bsa.child_branch_id")
        .inner_join("user_branches ub", "bsa.branch_id = ub.branch_id")
        .where_param_list("wf.current_stage", "stage")
        .where_param("l.is_closed", "isClosed")
        .where_param("l.loan_type", "loanType")
        .where_like_param("c.first_name", "firstName", LikePattern::End)
        .where_between_param("l.sanction_date", "sanctionDateFrom", "sanctionDateTo")?
        .where_param("l.urn_no", "urnNo")
        .where_param("lad.partner_branch_state", "partnerBranchState")
        .where_param("ub.user_id", "userId")
        .group_by("l.id, wf.id, c.first_name")
        .order_by_always_param(&loan_sort(), "-default", "sortBy");

    if params.opt_parse::<i64>("branchId")?.is_some() {
        qb = qb
            .inner_join("branchset_access bs", "l.branch_id = bs.child_branch_id")
            .where_param_as("bs.branch_id", "branchId", str::parse::<i64>)?;
    }

    qb.finish()
}

const BASE: &str = "SELECT wf.id, wf.current_stage, l.id AS loan_id, l.status, l.loan_amount, c.first_name \
    FROM loan_accounts l \
    INNER JOIN wf_data AS wf ON l.id = wf.reference_key \
    LEFT JOIN customer AS c ON l.customer_id = c.id \
    LEFT JOIN loan_account_addl lad ON lad.loan_id = l.id \
    INNER JOIN branchset_access bsa ON l.branch_id = bsa.child_branch_id \
    INNER JOIN user_branches ub ON bsa.branch_id = ub.branch_id";

#[test]
fn no_filters_renders_joins_group_and_default_sort() {
    let query = loan_search(&SearchParams::new()).unwrap();

    assert_eq!(
        query.to_sql(Placeholders::Numbered),
        format!("{BASE} GROUP BY l.id, wf.id, c.first_name ORDER BY l.created_at DESC")
    );
    assert!(query.params().is_empty());
}

#[test]
fn full_request_binds_every_present_filter() {
    let params = SearchParams::from_query(
        "stage=KYC&stage=SANCTION&stage=DISBURSAL&loanType=GOLD&firstName=Ra\
         &sanctionDateFrom=2024-01-01&sanctionDateTo=2024-12-31&userId=u-17\
         &isClosed=&sortBy=-loanAmount&branchId=12",
    );
    let query = loan_search(&params).unwrap();
    let sql = query.to_sql(Placeholders::Named);

    assert!(sql.contains(
        " WHERE wf.current_stage IN (:stage0, :stage1, :stage2) \
         AND l.loan_type = :loanType \
         AND c.first_name LIKE :firstName \
         AND l.sanction_date BETWEEN :sanctionDateFrom AND :sanctionDateTo \
         AND ub.user_id = :userId \
         AND bs.branch_id = :branchId GROUP BY"
    ));
    assert!(sql.contains("INNER JOIN branchset_access bs ON l.branch_id = bs.child_branch_id WHERE"));
    assert!(sql.ends_with("ORDER BY l.created_at DESC, l.loan_amount DESC"));
    assert!(!sql.contains("is_closed"));

    assert_eq!(
        query.params().keys().collect::<Vec<_>>(),
        vec![
            "stage0",
            "stage1",
            "stage2",
            "loanType",
            "firstName",
            "sanctionDateFrom",
            "sanctionDateTo",
            "userId",
            "branchId"
        ]
    );
    assert_eq!(format!("{:?}", query.params().get("firstName").unwrap()), "\"Ra%\"");
    assert_eq!(format!("{:?}", query.params().get("branchId").unwrap()), "12");
}

#[test]
fn count_query_uses_count_expression() {
    let params = SearchParams::from_query("loanType=GOLD");
    let query = loan_search(&params).unwrap();

    let count = query.to_count_sql(Placeholders::Numbered);
    assert!(count.starts_with("SELECT COUNT(*) FROM (SELECT wf.id FROM loan_accounts l"));
    assert!(count.ends_with("WHERE l.loan_type = $1 GROUP BY l.id, wf.id, c.first_name) AS x"));
    assert!(!count.contains("ORDER BY"));
}

#[test]
fn page_query_appends_limit_offset_after_filters() {
    let params = SearchParams::from_query("stage=KYC&userId=u-1");
    let query = loan_search(&params).unwrap();

    let sql = query.to_page_sql(Placeholders::Numbered);
    assert!(sql.contains("WHERE wf.current_stage = $1 AND ub.user_id = $2"));
    assert!(sql.ends_with("ORDER BY l.created_at DESC LIMIT $3 OFFSET $4"));
}

#[test]
fn bad_request_values_fail() {
    let err = loan_search(&SearchParams::from_query("branchId=twelve")).unwrap_err();
    assert!(err.is_client_fault());

    let err = loan_search(&SearchParams::from_query(
        "sanctionDateFrom=2024-01-01&sanctionDateTo=2024-02-30",
    ))
    .unwrap_err();
    assert!(err.is_malformed_date());
}

#[test]
fn reversed_sanction_range_is_ignored() {
    let params = SearchParams::from_query("sanctionDateFrom=2024-12-31&sanctionDateTo=2024-01-01");
    let query = loan_search(&params).unwrap();
    assert!(query.params().is_empty());
    assert!(!query.to_sql(Placeholders::Numbered).contains("BETWEEN"));
}
