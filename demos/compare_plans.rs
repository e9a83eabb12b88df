use financing_plan_builder::*;

fn grid_plan(
    name: &str,
    horizon: u32,
    uses: &[(UseCategory, u32, f64)],
    sources: &[(SourceCategory, u32, f64)],
) -> Result<Plan> {
    let uses: UsesGrid = uses.iter().map(|&(c, y, v)| ((c, y), v)).collect();
    let sources: SourcesGrid = sources.iter().map(|&(c, y, v)| ((c, y), v)).collect();
    create_plan(name, horizon, &uses, &sources)
}

fn main() -> Result<()> {
    println!("📊 Financing Plan Comparison Demo\n");

    let mut repository = PlanRepository::new();

    // Mostly self-financed, modest borrowing.
    repository.add(grid_plan(
        "Organic growth",
        3,
        &[
            (UseCategory::Investments, 1, 400_000.0),
            (UseCategory::WorkingCapitalRequirement, 1, 60_000.0),
            (UseCategory::Investments, 2, 150_000.0),
            (UseCategory::LoanRepayments, 2, 40_000.0),
            (UseCategory::LoanRepayments, 3, 40_000.0),
            (UseCategory::Dividends, 3, 30_000.0),
        ],
        &[
            (SourceCategory::SelfFinancingCapacity, 1, 220_000.0),
            (SourceCategory::MediumLongTermLoans, 1, 200_000.0),
            (SourceCategory::Subsidies, 1, 50_000.0),
            (SourceCategory::SelfFinancingCapacity, 2, 210_000.0),
            (SourceCategory::SelfFinancingCapacity, 3, 240_000.0),
        ],
    )?)?;

    // Debt-funded expansion with a larger end balance.
    repository.add(grid_plan(
        "Leveraged expansion",
        3,
        &[
            (UseCategory::Investments, 1, 900_000.0),
            (UseCategory::WorkingCapitalRequirement, 1, 120_000.0),
            (UseCategory::LoanRepayments, 2, 150_000.0),
            (UseCategory::LoanRepayments, 3, 150_000.0),
        ],
        &[
            (SourceCategory::SelfFinancingCapacity, 1, 150_000.0),
            (SourceCategory::MediumLongTermLoans, 1, 950_000.0),
            (SourceCategory::SelfFinancingCapacity, 2, 260_000.0),
            (SourceCategory::SelfFinancingCapacity, 3, 330_000.0),
        ],
    )?)?;

    for plan in repository.plans() {
        let report = analyze_plan(plan);
        println!("{}", report.to_markdown());
    }

    let comparison = repository.compare_selected(&["Organic growth", "Leveraged expansion"])?;
    println!(
        "Recommended: {} ({:?})",
        comparison.recommendation.plan_name, comparison.recommendation.kind
    );

    let report = compare_plans(repository.plans())?;
    println!("\n{}", report.to_markdown());
    println!("CSV export:\n{}", report.to_csv()?);

    Ok(())
}
