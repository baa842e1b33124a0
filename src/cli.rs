use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "braincheck")]
#[command(about = "MRI画像の事前検証と解析サーバーへの送信", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像の寸法・縦横比を検証（ファイルまたはフォルダ）
    Check {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,
    },

    /// 画像を検証して解析サーバーへ送信
    Submit {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 解析サーバーのURL（例: http://127.0.0.1:5000）
        #[arg(short, long)]
        endpoint: Option<String>,

        /// 結果JSONの出力先
        #[arg(short, long, default_value = "prediction_results.json")]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サーバーのURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
