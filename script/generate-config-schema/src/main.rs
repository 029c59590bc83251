use color_picker::PickerConfig;

fn main() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(PickerConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
