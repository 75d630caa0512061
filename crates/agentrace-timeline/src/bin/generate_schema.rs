use schemars::schema_for;
use schemars::JsonSchema;
use std::fs;
use std::path::{Path, PathBuf};

use agentrace_timeline::{DisplayBlock, MessageBlockInfo, PlanLinkInfo, SessionEvent};

fn write_schema<T: JsonSchema>(
    out_dir: &Path,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = schema_for!(T);
    let json = serde_json::to_string_pretty(&schema)?;
    fs::write(out_dir.join(format!("{name}.json")), json)?;
    Ok(())
}

fn schema_output_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.join("../../schemas")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = schema_output_dir();
    fs::create_dir_all(&out_dir)?;

    write_schema::<SessionEvent>(&out_dir, "session_event")?;
    write_schema::<DisplayBlock>(&out_dir, "display_block")?;
    write_schema::<MessageBlockInfo>(&out_dir, "message_block_info")?;
    write_schema::<PlanLinkInfo>(&out_dir, "plan_link_info")?;

    Ok(())
}
