use crate::output::{print_json, print_table};

pub fn run(json: bool) -> anyhow::Result<()> {
    let catalog = trd_core::section::catalog();

    if json {
        print_json(&catalog)?;
        return Ok(());
    }

    let rows = catalog
        .iter()
        .map(|s| vec![s.key.to_string(), s.title.to_string()])
        .collect();
    print_table(&["KEY", "TITLE"], rows);
    Ok(())
}
