use std::{fs, path::PathBuf, time::Duration};

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use skrybe_auth_codec::{
    creation_digest, encode_payload, AuthorizingSigner, CreationVerifier, LocalSigner,
    PayloadEncoding,
};
use skrybe_deployer::{
    chain::{artifact_bytecode, Connection, RemoteFactory},
    config::{load_request, read_key, ETHSCRIPTION_BASE_FEE},
    deployments::{record_deployment, recorded_address},
};

/// Deploy `SkrybeFactory` and submit authorized collection-creation requests.
///
/// Settings fall back to environment variables; a `.env` file in the working directory is
/// loaded first.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy the factory from a compiled artifact and record it in the deployments JSON.
    Deploy(DeployArgs),
    /// Sign a creation request with the authorizer key and submit it as the connected account.
    CreateCollection(CreateArgs),
    /// Print the authorization digest and signature for a requester, without touching the chain.
    Authorize(AuthorizeArgs),
}

#[derive(Args, Debug)]
struct ConnectArgs {
    /// JSON-RPC endpoint.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the sending account's private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Sending account's private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path", hide_env_values = true)]
    private_key: Option<String>,

    /// Seconds to wait for a receipt before giving up.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

impl ConnectArgs {
    fn connect(&self) -> Result<Connection> {
        let key = read_key(self.private_key.as_deref(), self.private_key_path.as_deref())
            .context("missing sender key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)")?;
        Connection::open(&self.rpc_url, &key, Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Args, Debug)]
struct LedgerArgs {
    /// Path of the deployments JSON (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` for the factory.
    #[arg(long, default_value = "skrybe-factory")]
    contract_key: String,
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Creation request JSON (camelCase fields, integers as decimal or 0x strings).
    #[arg(long)]
    request: Option<PathBuf>,

    /// Collection id; overrides the request file, or builds the default request.
    #[arg(long)]
    collection_id: Option<String>,

    /// Payload shape bound into the authorization; must match what the factory recomputes.
    #[arg(long, value_enum, default_value_t = Encoding::CollectionId)]
    encoding: Encoding,

    /// Authorizer private key (hex).
    #[arg(long, env = "AUTHORIZER_KEY", hide_env_values = true)]
    authorizer_key: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Encoding {
    /// Raw collection id string.
    CollectionId,
    /// Hex text of the ABI-encoded numeric terms.
    Terms,
}

impl From<Encoding> for PayloadEncoding {
    fn from(e: Encoding) -> Self {
        match e {
            Encoding::CollectionId => PayloadEncoding::CollectionId,
            Encoding::Terms => PayloadEncoding::Terms,
        }
    }
}

#[derive(Args, Debug)]
struct DeployArgs {
    #[command(flatten)]
    connect: ConnectArgs,

    #[command(flatten)]
    ledger: LedgerArgs,

    /// Compiled `SkrybeFactory` artifact (Hardhat or Foundry JSON).
    #[arg(long, env = "FACTORY_ARTIFACT")]
    artifact: PathBuf,

    /// Address whose signatures the factory accepts.
    #[arg(long, env = "AUTHORIZER_ADDRESS")]
    authorizer: Address,

    /// Ethscription fee recipient.
    #[arg(long, env = "ETHSCRIBER_ADDRESS")]
    ethscriber: Address,

    /// Network name stored in the deployments JSON (eg, devnet, sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[command(flatten)]
    connect: ConnectArgs,

    #[command(flatten)]
    ledger: LedgerArgs,

    #[command(flatten)]
    request: RequestArgs,

    /// Factory address; defaults to the one recorded in the deployments JSON.
    #[arg(long, env = "FACTORY_CONTRACT_ADDRESS")]
    factory: Option<Address>,

    /// Ethscription fee (wei).
    #[arg(long, default_value_t = U256::from(ETHSCRIPTION_BASE_FEE))]
    fee: U256,
}

#[derive(Args, Debug)]
struct AuthorizeArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Account that will submit `createCollection`.
    #[arg(long)]
    requester: Address,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Deploy(args) => deploy(args),
        Command::CreateCollection(args) => create_collection(args),
        Command::Authorize(args) => authorize(args),
    }
}

fn deploy(args: DeployArgs) -> Result<()> {
    let artifact: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(&args.artifact)
            .with_context(|| format!("failed reading {}", args.artifact.display()))?,
    )
    .with_context(|| format!("failed parsing artifact {}", args.artifact.display()))?;
    let bytecode = artifact_bytecode(&artifact)?;

    let connection = args.connect.connect()?;
    log::info!("deploying factory from {}", connection.account());
    let deployment = connection.deploy_factory(&bytecode, args.authorizer, args.ethscriber)?;

    record_deployment(
        &args.ledger.deployments_path,
        &args.network,
        &args.ledger.contract_key,
        &args.connect.rpc_url,
        &deployment,
    )?;

    println!(
        "Deployed `{}` to {} (tx {})",
        args.ledger.contract_key, deployment.address, deployment.tx_hash
    );
    Ok(())
}

fn create_collection(args: CreateArgs) -> Result<()> {
    let factory = match args.factory {
        Some(address) => address,
        None => recorded_address(&args.ledger.deployments_path, &args.ledger.contract_key)?
            .ok_or_else(|| {
                anyhow!(
                    "no factory address: pass --factory or deploy `{}` into {}",
                    args.ledger.contract_key,
                    args.ledger.deployments_path.display()
                )
            })?,
    };

    let request = load_request(args.request.request.as_deref(), args.request.collection_id.as_deref())?;
    let authorizer = LocalSigner::from_hex(&args.request.authorizer_key)
        .map_err(|e| anyhow!("authorizer key: {e}"))?;

    let connection = args.connect.connect()?;
    let requester = connection.account();

    let digest = creation_digest(requester, &request, args.request.encoding.into())?;
    let signature = authorizer
        .sign_digest(digest)
        .map_err(|e| anyhow!("authorizer signing: {e}"))?;

    let mut remote = RemoteFactory::new(connection, factory);
    log::info!("submitting `{}` to factory {}", request.collection_id, remote.address());
    let receipt = remote
        .create_collection(requester, &request, args.fee, &signature)
        .map_err(|e| anyhow!("createCollection `{}` rejected: {e}", request.collection_id))?;

    println!(
        "Created collection `{}` at {}{}",
        receipt.collection_id,
        receipt.collection,
        receipt
            .tx_hash
            .map(|h| format!(" (tx {h})"))
            .unwrap_or_default()
    );
    Ok(())
}

fn authorize(args: AuthorizeArgs) -> Result<()> {
    let request = load_request(args.request.request.as_deref(), args.request.collection_id.as_deref())?;
    let authorizer = LocalSigner::from_hex(&args.request.authorizer_key)
        .map_err(|e| anyhow!("authorizer key: {e}"))?;
    let encoding: PayloadEncoding = args.request.encoding.into();

    let digest = creation_digest(args.requester, &request, encoding)?;
    let signature = authorizer
        .sign_digest(digest)
        .map_err(|e| anyhow!("authorizer signing: {e}"))?;

    println!("authorizer: {}", authorizer.address());
    println!("requester:  {}", args.requester);
    println!("payload:    {}", encode_payload(&encoding.payload_for(&request)));
    println!("digest:     {digest}");
    println!("signature:  0x{}", hex::encode(signature));
    Ok(())
}
