pub struct Device
{
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub short_description: &'static str,
    pub full_description: &'static str,
    pub usage: &'static str,
    pub wit_context: &'static str,
    pub challenge: &'static str,
    pub tts_intro: &'static str,
    pub tts_content: &'static str,
}

pub fn devices() -> &'static [Device]
{
    &DEVICES
}

pub fn device_by_id(id: &str) -> Option<&'static Device>
{
    DEVICES.iter().find(|device| device.id == id)
}

static DEVICES: [Device; 10] = [
    Device {
        id: "alexa",
        name: "Alexa",
        icon: "Mic",
        short_description: "Assistente de voz inteligente.",
        full_description: "A Alexa é uma caixinha inteligente que fala com a gente. Ela responde perguntas e toca música.",
        usage: "Serve para ajudar a encontrar informações rápidas só usando a voz.",
        wit_context: "No Núcleo WIT, perguntamos para a Alexa como está o clima antes da aula.",
        challenge: "Pergunte: \"Alexa, que som o gato faz?\"",
        tts_intro: "Ahoy! Vamos navegar e conhecer a Alexa?",
        tts_content: "A Alexa é uma assistente inteligente. Ela serve para responder perguntas e nos ajudar. No Núcleo WIT, usamos para saber o clima. Tente perguntar algo para ela!",
    },
    Device {
        id: "vr-goggles",
        name: "Óculos VR",
        icon: "Glasses",
        short_description: "Viaje sem sair do lugar.",
        full_description: "Os Óculos de Realidade Virtual mostram mundos digitais. Parece que estamos dentro do jogo!",
        usage: "Serve para visitar lugares distantes ou imaginários.",
        wit_context: "Viajamos para o espaço sideral usando os óculos na aula de ciências.",
        challenge: "Imagine que você está na lua. O que você vê?",
        tts_intro: "Terra à vista! Com este óculos, podemos ir longe.",
        tts_content: "Estes são os Óculos de Realidade Virtual. Eles servem para nos levar a mundos digitais. No WIT, usamos para ir ao espaço! Imagine que você está flutuando.",
    },
    Device {
        id: "mouse",
        name: "Mouse",
        icon: "Mouse",
        short_description: "Move a setinha na tela.",
        full_description: "O mouse é como a mão do computador. Ele clica e arrasta coisas.",
        usage: "Serve para controlar o cursor e abrir programas.",
        wit_context: "Usamos o mouse para desenhar no computador.",
        challenge: "Faça um movimento de círculo com sua mão na mesa.",
        tts_intro: "Olha o ratinho no convés! É o mouse.",
        tts_content: "O mouse controla a setinha na tela. Ele serve para clicar e abrir coisas. No WIT, usamos para desenhar. Tente mexer a mão como se usasse um mouse.",
    },
    Device {
        id: "keyboard",
        name: "Teclado",
        icon: "Keyboard",
        short_description: "Para escrever no computador.",
        full_description: "O teclado tem muitas letras e números. É como uma máquina de escrever moderna.",
        usage: "Serve para digitar textos e comandos.",
        wit_context: "Escrevemos nossos nomes nos projetos usando o teclado.",
        challenge: "Encontre a primeira letra do seu nome em um teclado imaginário.",
        tts_intro: "Muitas teclas neste mapa! Vamos escrever?",
        tts_content: "Este é o teclado. Ele serve para digitar textos. No WIT, usamos para escrever nomes. Qual é a primeira letra do seu nome?",
    },
    Device {
        id: "camera",
        name: "Câmera",
        icon: "Camera",
        short_description: "Guarda momentos em fotos.",
        full_description: "A câmera captura imagens e vídeos. Ela tem uma lente que vê tudo.",
        usage: "Serve para registrar atividades e criar filmes.",
        wit_context: "Filmamos nossas apresentações para assistir depois.",
        challenge: "Faça uma pose de capitão para uma foto!",
        tts_intro: "Xis! A câmera vai capturar você.",
        tts_content: "A câmera serve para tirar fotos e vídeos. Ela guarda momentos. No WIT, usamos para filmar apresentações. Faça uma pose bem legal!",
    },
    Device {
        id: "tablet",
        name: "Tablet",
        icon: "Tablet",
        short_description: "Computador que é só tela.",
        full_description: "O tablet é leve e usamos tocando na tela com o dedo.",
        usage: "Serve para jogos educativos, leitura e vídeos.",
        wit_context: "Usamos o tablet para jogar o jogo da memória.",
        challenge: "Toque o dedo no ar como se estivesse arrastando um mapa.",
        tts_intro: "É como uma carta de navegação digital!",
        tts_content: "O tablet é um computador de tela de toque. Serve para jogos e leitura. No WIT, usamos para jogar. Tente arrastar o dedo no ar.",
    },
    Device {
        id: "smart-bulb",
        name: "Lâmpada Smart",
        icon: "Lightbulb",
        short_description: "Luz que muda de cor.",
        full_description: "Esta lâmpada obedece comandos. Ela pode ficar azul, vermelha ou verde.",
        usage: "Serve para iluminar e decorar o ambiente.",
        wit_context: "Deixamos a sala azul quando é hora de relaxar.",
        challenge: "Que cor você escolheria para a sua cabine agora?",
        tts_intro: "Que farol bonito! Ele muda de cor.",
        tts_content: "A Lâmpada Inteligente muda de cor quando pedimos. Serve para decorar. No WIT, usamos luz azul para relaxar. Qual sua cor favorita?",
    },
    Device {
        id: "headset",
        name: "Headset",
        icon: "Headphones",
        short_description: "Fones com microfone.",
        full_description: "O headset ajuda a ouvir bem e falar usando o microfone.",
        usage: "Serve para ouvir bem e falar usando o microfone.",
        wit_context: "Usamos para gravar histórias que criamos.",
        challenge: "Coloque as mãos nas orelhas e diga \"Oi\" baixinho.",
        tts_intro: "Escute o som do mar! Com isso ouvimos tudo.",
        tts_content: "O headset serve para ouvir bem e falar usando o microfone. No WIT, gravamos histórias com ele. Diga oi baixinho!",
    },
    Device {
        id: "chroma",
        name: "Chroma Key",
        icon: "Maximize",
        short_description: "O pano verde mágico.",
        full_description: "Um fundo verde que o computador troca por qualquer imagem.",
        usage: "Serve para criar cenários incríveis em vídeos.",
        wit_context: "Ficamos invisíveis usando uma roupa verde na frente dele!",
        challenge: "Se você pudesse navegar para qualquer lugar, onde estaria?",
        tts_intro: "Magia no convés? Não, é tecnologia!",
        tts_content: "O Chroma Key é o fundo verde mágico. Serve para mudar o cenário dos vídeos. No WIT, brincamos de ficar invisíveis. Onde você gostaria de estar?",
    },
    Device {
        id: "smart-watch",
        name: "Relógio Smart",
        icon: "Watch",
        short_description: "Relógio que faz tudo.",
        full_description: "Um relógio que conta passos e mostra mensagens.",
        usage: "Serve para ver as horas e cuidar da saúde.",
        wit_context: "Medimos quantos passos damos no recreio.",
        challenge: "Pule 3 vezes para o relógio contar!",
        tts_intro: "Tic-tac, hora da aventura!",
        tts_content: "O Relógio Inteligente conta passos e mostra mensagens. Serve para saúde. No WIT, contamos nossos passos. Pule três vezes!",
    },
];

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn catalog_has_ten_devices_with_unique_ids()
    {
        let all = devices();
        assert_eq!(all.len(), 10);
        for (i, device) in all.iter().enumerate() {
            assert!(
                all[i + 1..].iter().all(|other| other.id != device.id),
                "duplicate id {}",
                device.id
            );
        }
    }

    #[test]
    fn lookup_by_id_matches_order()
    {
        let entry = device_by_id("tablet").unwrap();
        assert_eq!(entry.name, "Tablet");
        assert!(device_by_id("floppy").is_none());
    }
}
