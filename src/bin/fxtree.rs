use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fxtree", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the generated shader source for an effect description.
    Emit(EmitArgs),
    /// Print the program key words and fingerprint.
    Key(InArgs),
    /// Print the tree dump and its pre-order traversal.
    Dump(InArgs),
    /// Evaluate a constant-foldable tree for a constant input color.
    Eval(EvalArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input effect description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct EmitArgs {
    /// Input effect description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Program options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Also print the uniform values.
    #[arg(long)]
    uniforms: bool,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input effect description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Premultiplied input color as `r,g,b,a`.
    #[arg(long, default_value = "1,1,1,1", value_parser = parse_color)]
    input: fxtree::PmColor4f,
}

fn parse_color(s: &str) -> Result<fxtree::PmColor4f, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let c: [f32; 4] = parts
        .try_into()
        .map_err(|v: Vec<f32>| format!("expected 4 components, got {}", v.len()))?;
    fxtree::PmColor4f::try_from_array(c).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Emit(args) => cmd_emit(args),
        Command::Key(args) => cmd_key(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Eval(args) => cmd_eval(args),
    }
}

fn read_tree(path: &Path) -> anyhow::Result<Box<fxtree::EffectNode>> {
    let desc = fxtree::EffectDesc::from_path(path)
        .with_context(|| format!("read effect description '{}'", path.display()))?;
    let root = desc
        .build()
        .with_context(|| format!("build effect tree from '{}'", path.display()))?;
    root.with_context(|| format!("'{}' describes an absent effect", path.display()))
}

fn cmd_emit(args: EmitArgs) -> anyhow::Result<()> {
    let root = read_tree(&args.in_path)?;
    let opts = match &args.opts {
        Some(p) => fxtree::ProgramOpts::from_path(p)
            .with_context(|| format!("read program options '{}'", p.display()))?,
        None => fxtree::ProgramOpts::default(),
    };

    let program = fxtree::build_program(&root, &opts).context("build program")?;
    print!("{}", program.source);

    if args.uniforms {
        let data = program.uniform_data(&root).context("collect uniform values")?;
        println!();
        for (name, values) in data.iter() {
            println!("// {name} = {values:?}");
        }
    }
    eprintln!("fingerprint {}", program.fingerprint);
    Ok(())
}

fn cmd_key(args: InArgs) -> anyhow::Result<()> {
    let root = read_tree(&args.in_path)?;
    let key = fxtree::ProgramKey::of(&root);
    let words = key
        .words()
        .iter()
        .map(|w| format!("{w:08x}"))
        .collect::<Vec<_>>()
        .join(" ");
    println!("words: {words}");
    println!("fingerprint: {}", key.fingerprint());
    Ok(())
}

fn cmd_dump(args: InArgs) -> anyhow::Result<()> {
    let root = read_tree(&args.in_path)?;
    print!("{}", root.dump_tree_info());
    println!();
    for (i, node) in root.iter().enumerate() {
        println!(
            "{i:>3} {:<16} flags={:?} opt={:?}",
            node.name(),
            node.flags(),
            node.optimization_flags()
        );
    }
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let root = read_tree(&args.in_path)?;
    let out = root
        .constant_output(args.input)
        .with_context(|| format!("evaluate '{}'", root.name()))?;
    println!("{} {} {} {}", out.r, out.g, out.b, out.a);
    Ok(())
}
