use super::*;
use assertables::*;
use chrono::NaiveDate;

fn record(day: u32, value: f64) -> Record {
    Record::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap(), value)
}

// ==================== KPI ====================

#[test]
fn test_kpis_empty() {
    let kpis = calculate_kpis(&[]);
    assert_eq!(
        kpis,
        KpiSet {
            total_revenue: 0.0,
            total_quantity: 0.0,
            average_value: 0.0,
            average_quantity: 0.0,
            efficiency: 0.0,
        }
    );
}

#[test]
fn test_kpis_quantity_defaults_to_one() {
    let records = vec![
        record(1, 100.0).with_quantity(4.0),
        record(2, 50.0),
        record(3, 30.0).with_quantity(5.0),
    ];
    let kpis = calculate_kpis(&records);

    assert_eq!(kpis.total_revenue, 180.0);
    assert_eq!(kpis.total_quantity, 10.0);
    assert_eq!(kpis.average_value, 60.0);
    assert_eq!(kpis.average_quantity, 10.0 / 3.0);
    assert_eq!(kpis.efficiency, 18.0);
}

#[test]
fn test_kpis_zero_quantity() {
    let records = vec![record(1, 10.0).with_quantity(0.0)];
    let kpis = calculate_kpis(&records);
    assert_eq!(kpis.total_quantity, 0.0);
    assert_eq!(kpis.efficiency, 0.0);
}

// ==================== パレート ====================

#[test]
fn test_pareto_minimal_prefix() {
    let values = [10.0, 50.0, 5.0, 30.0, 5.0];
    let result = pareto_analysis(&values, |v| *v);

    assert_eq!(result.selected_count, 2);
    assert_eq!(result.selected_percentage_of_items, 40.0);
    assert_eq!(result.items[0].item, 50.0);
    assert_eq!(result.items[0].cumulative_percentage, 50.0);
    assert_eq!(result.items[1].item, 30.0);
    assert_eq!(result.items[1].cumulative_percentage, 80.0);
    assert!(result.items.iter().all(|i| i.is_in_top80));
}

#[test]
fn test_pareto_includes_boundary_item() {
    let values = [50.0, 20.0, 20.0, 10.0];
    let result = pareto_analysis(&values, |v| *v);

    assert_eq!(result.selected_count, 3);
    let boundary = result.items.last().unwrap();
    assert_eq!(boundary.cumulative_percentage, 90.0);
    assert!(!boundary.is_in_top80);
    assert!(result.items[..2].iter().all(|i| i.is_in_top80));
}

#[test]
fn test_pareto_records_by_quantity() {
    let records = vec![
        record(1, 10.0).with_quantity(1.0).with_category("a"),
        record(2, 20.0).with_quantity(9.0).with_category("b"),
        record(3, 30.0).with_category("c"),
    ];

    let by_quantity = pareto_records(&records, ParetoKey::Quantity);
    assert_eq!(by_quantity.selected_count, 1);
    assert_eq!(by_quantity.items[0].item.category.as_deref(), Some("b"));
    assert_gt!(by_quantity.items[0].cumulative_percentage, 80.0);

    let by_value = pareto_records(&records, ParetoKey::Value);
    assert_eq!(by_value.items[0].item.category.as_deref(), Some("c"));
    assert_eq!(by_value.selected_count, 2);
}

#[test]
fn test_pareto_empty_and_zero_total() {
    let empty: [f64; 0] = [];
    let result = pareto_analysis(&empty, |v| *v);
    assert_eq!(result.selected_count, 0);
    assert_eq!(result.selected_percentage_of_items, 0.0);

    let zeros = [0.0, 0.0, 0.0];
    let result = pareto_analysis(&zeros, |v| *v);
    assert_eq!(result.selected_count, 3);
    assert!(result.items.iter().all(|i| i.cumulative_percentage == 0.0));
}

// ==================== 収益性 ====================

#[test]
fn test_efficiency_metrics_profitable() {
    let metrics = efficiency_metrics(150.0, 100.0);
    assert_eq!(metrics.profit, 50.0);
    assert_eq!(metrics.roi, 50.0);
    assert!((metrics.profit_margin - 100.0 / 3.0).abs() < 1e-12);
    assert_eq!(metrics.breakeven, 100.0);
    assert!(metrics.is_profitable);
}

#[test]
fn test_efficiency_metrics_loss_and_zero_guards() {
    let metrics = efficiency_metrics(80.0, 100.0);
    assert_eq!(metrics.roi, -20.0);
    assert!(!metrics.is_profitable);

    let metrics = efficiency_metrics(100.0, 0.0);
    assert_eq!(metrics.roi, 0.0);
    assert_eq!(metrics.breakeven, 0.0);
    assert!(!metrics.is_profitable);

    let metrics = efficiency_metrics(0.0, 50.0);
    assert_eq!(metrics.profit_margin, 0.0);
    assert_eq!(metrics.roi, -100.0);
}

// ==================== カテゴリ構成 ====================

#[test]
fn test_category_breakdown() {
    let records = vec![
        record(1, 30.0).with_category("books"),
        record(2, 50.0).with_category("games"),
        record(3, 10.0).with_category("books"),
        record(4, 10.0),
    ];

    let shares = category_breakdown(&records);
    assert_eq!(shares.len(), 3);

    assert_eq!(shares[0].category.as_deref(), Some("games"));
    assert_eq!(shares[0].share_percentage, 50.0);
    assert_eq!(shares[1].category.as_deref(), Some("books"));
    assert_eq!(shares[1].total, 40.0);
    assert_eq!(shares[1].count, 2);
    assert_eq!(shares[2].category, None);
    assert_eq!(shares[2].share_percentage, 10.0);
}

#[test]
fn test_category_breakdown_zero_total() {
    let records = vec![record(1, 0.0).with_category("x")];
    let shares = category_breakdown(&records);
    assert_eq!(shares[0].share_percentage, 0.0);
}
