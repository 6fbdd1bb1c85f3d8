use crate::ai::{OpenRouterClient, VisionClient, generate_questions};
use crate::logger;
use crate::models::{AiRequest, AiResponse, AiStage};
use crossbeam_channel::{Receiver, Sender};
use std::thread;

pub fn spawn_ai_worker(
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("notebook-quiz::ai_worker".to_string())
        .spawn(move || loop {
            match ai_rx.recv() {
                Ok(AiRequest::Analyze {
                    image_paths,
                    language_hint,
                }) => {
                    logger::log(&format!(
                        "Worker received analyze request for {} image(s)",
                        image_paths.len()
                    ));

                    let client = match VisionClient::from_env() {
                        Ok(client) => client,
                        Err(e) => {
                            let _ = ai_tx.send(AiResponse::Error {
                                stage: AiStage::Analysis,
                                error: format!("Failed to create vision client: {}", e),
                            });
                            continue;
                        }
                    };

                    let rt = tokio::runtime::Runtime::new().unwrap();

                    let result =
                        rt.block_on(async { client.analyze_pages(&image_paths, language_hint).await });

                    match result {
                        Ok(analysis) => {
                            logger::log("Worker sending analysis success");
                            let _ = ai_tx.send(AiResponse::Analysis(analysis));
                        }
                        Err(e) => {
                            logger::error(&format!("Worker analysis error: {}", e));
                            let _ = ai_tx.send(AiResponse::Error {
                                stage: AiStage::Analysis,
                                error: format!("Notebook analysis failed: {}", e),
                            });
                        }
                    }
                }
                Ok(AiRequest::Generate { analysis, plan }) => {
                    logger::log(&format!(
                        "Worker received generate request for {} question(s)",
                        plan.total()
                    ));

                    let client = match OpenRouterClient::new() {
                        Ok(client) => client,
                        Err(e) => {
                            let _ = ai_tx.send(AiResponse::Error {
                                stage: AiStage::Generation,
                                error: format!("Failed to create AI client: {}", e),
                            });
                            continue;
                        }
                    };

                    let rt = tokio::runtime::Runtime::new().unwrap();

                    let result =
                        rt.block_on(async { generate_questions(&client, &analysis, &plan).await });

                    match result {
                        Ok(questions) => {
                            logger::log(&format!(
                                "Worker sending {} generated question(s)",
                                questions.len()
                            ));
                            let _ = ai_tx.send(AiResponse::Questions(questions));
                        }
                        Err(e) => {
                            logger::error(&format!("Worker generation error: {}", e));
                            let _ = ai_tx.send(AiResponse::Error {
                                stage: AiStage::Generation,
                                error: format!("Quiz generation failed: {}", e),
                            });
                        }
                    }
                }
                Err(_) => {
                    // Channel disconnected, exit worker
                    logger::log("Worker channel disconnected, exiting");
                    break;
                }
            }
        })
        .expect("Failed to spawn AI worker thread")
}
