use financing_plan_builder::*;

const TABLE: &str = "Poste,Année 1,Année 2\n\
Reliquat des plans antérieurs,15 000,0\n\
Équipements atelier,180 000,45 000\n\
Échéance emprunt 2021,30 000,30 000\n\
Capacité autofinancement,120 000,140 000\n\
Crédit bancaire,90 000,0\n\
Aides régionales,25 000,0\n\
Frais de dossier,1 500,0\n";

fn main() -> Result<()> {
    println!("📥 Spreadsheet Import Demo\n");
    println!("{}", Taxonomy::to_markdown());

    let outcome = FinancingPlanProcessor::import_csv(TABLE.as_bytes(), "Imported plan", false)?;

    println!("Classified rows:");
    for row in &outcome.assignments {
        println!("  - {:<35} -> {}", row.label, row.category);
    }

    if !outcome.unclassified.is_empty() {
        println!("\n⚠️  Rows that matched no category (not included in the plan):");
        for row in &outcome.unclassified {
            println!("  - {} {:?}", row.label, row.values);
        }
    }

    let report = analyze_plan(&outcome.plan);
    println!("\n{}", report.to_markdown());

    match FinancingPlanProcessor::import_csv(TABLE.as_bytes(), "Strict", true) {
        Ok(_) => println!("Strict import succeeded"),
        Err(e) => println!("Strict import rejected: {}", e),
    }

    Ok(())
}
