//! Shader worker inspection command.

use anyhow::{Context, Result};

use fx_effects::{ChangeType, RecordingContext, RecordingGraph, RenderBackend, TransformNode};

use crate::ShaderArgs;

pub fn run(args: ShaderArgs) -> Result<()> {
    let effect = super::build_effect(args.effect, args.params.as_deref())?;
    let mut worker = effect
        .create_worker(RenderBackend::Gpu)
        .and_then(|w| w.into_shader())
        .with_context(|| format!("{} has no shader worker", effect.kind()))?;

    let mut context = RecordingContext::new();
    let mut graph = RecordingGraph::new();
    worker.initialize(&mut context, &mut graph)?;
    worker.prepare_for_render(ChangeType::Properties)?;

    let shader = worker.shader();
    println!("{}", effect.kind());
    println!("  Properties: {}", super::describe_properties(effect.as_ref())?);
    println!("  Shader:     {} ({})", shader.name, shader.id);
    println!("  Entry:      {}", shader.entry_point);
    println!("  Inputs:     {}", worker.input_count());
    if let Some(TransformNode::ShaderDraw { shader, input_count }) = graph.current() {
        println!("  Graph:      draw {shader} with {input_count} input(s)");
    }

    match worker.constant_buffer() {
        Some(bytes) => {
            let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02X}")).collect();
            println!("  Constants:  {} bytes", bytes.len());
            for line in hex.chunks(16) {
                println!("    {}", line.join(" "));
            }
        }
        None => println!("  Constants:  none"),
    }

    let options = worker.resource_texture_options();
    let textures = worker.resource_textures()?;
    for (i, (tex, opt)) in textures.iter().zip(&options).enumerate() {
        println!(
            "  Texture {i}:  {}x{} {} pitch {} ({:?}, {:?}/{:?})",
            tex.width, tex.height, tex.color_mode, tex.pitch, opt.filter, opt.border_x, opt.border_y
        );
    }
    if textures.is_empty() {
        println!("  Textures:   none");
    }

    if args.source {
        println!("{}", worker.shader().source);
    }
    Ok(())
}
