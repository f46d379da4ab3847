use env_logger::Env;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("haunted_house=info,wgpu=warn")).init();

    let app = haunted_house::default()?;
    app.run()
}
